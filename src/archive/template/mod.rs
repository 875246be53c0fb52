// gitarchive: archive test results into Git
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Keyword templates.
//!
//! ```text
//! "Run {id} of {branch}"  --parse-->  [Lit "Run ", Field id, Lit " of ", Field branch]
//!                         --render--> "Run 42 of master"
//!
//! {{ and }} render a literal brace.
//! ```
//!
//! The parsed segments are also what the tag allocator builds its matcher
//! from, so literal text never passes through a regex unescaped.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TemplateError;

/// A value that can be substituted into a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TemplateValue {
    Int(i64),
    Str(String),
}

impl fmt::Display for TemplateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for TemplateValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for TemplateValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for TemplateValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for TemplateValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

/// Keyword context that templates are rendered against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateContext(BTreeMap<String, TemplateValue>);

impl TemplateContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a copy of the context with `key` set to `value`.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<TemplateValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<TemplateValue>) {
        self.0.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&TemplateValue> {
        self.0.get(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Merge `other` on top of `self`; keys in `other` win.
    pub fn extend(&mut self, other: Self) {
        self.0.extend(other.0);
    }

    /// Look up `field` for `template`, failing with the list of valid keys.
    pub(crate) fn lookup(&self, template: &str, field: &str) -> Result<&TemplateValue, TemplateError> {
        self.get(field).ok_or_else(|| TemplateError::UnknownField {
            template: template.to_string(),
            field: field.to_string(),
            available: self.keys().map(str::to_string).collect(),
        })
    }
}

impl<K: Into<String>, V: Into<TemplateValue>> FromIterator<(K, V)> for TemplateContext {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// One piece of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment {
    Literal(String),
    Field(String),
}

/// Split a template into literal text and `{field}` placeholders.
pub(crate) fn parse(template: &str) -> Result<Vec<Segment>, TemplateError> {
    let malformed = |message: &str| TemplateError::Malformed {
        template: template.to_string(),
        message: message.to_string(),
    };

    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                literal.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                literal.push('}');
            }
            '}' => return Err(malformed("single '}' encountered")),
            '{' => {
                let mut field = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some('{') | None => return Err(malformed("unmatched '{'")),
                        Some(c) => field.push(c),
                    }
                }
                if field.is_empty() {
                    return Err(malformed("empty field name"));
                }
                if field.contains([':', '!']) {
                    return Err(malformed("format specifications are not supported"));
                }
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Field(field));
            }
            c => literal.push(c),
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}

/// Expand `{key}` placeholders in `template` from `context`.
///
/// # Errors
///
/// Returns a `TemplateError` naming the missing key (and listing the valid
/// ones) if the template references a key the context lacks, or if the
/// template has unbalanced braces.
///
/// # Example
///
/// ```
/// use gitarchive::archive::template::{expand, TemplateContext};
///
/// let ctx = TemplateContext::new().with("id", 42_i64);
/// assert_eq!(expand("Run {id}", &ctx).unwrap(), "Run 42");
/// ```
pub fn expand(template: &str, context: &TemplateContext) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    for segment in parse(template)? {
        match segment {
            Segment::Literal(text) => out.push_str(&text),
            Segment::Field(field) => {
                let value = context.lookup(template, &field)?;
                out.push_str(&value.to_string());
            }
        }
    }
    Ok(out)
}

/// Render a `subject` / `body` template pair into a message.
///
/// The subject is trimmed; the body follows after a blank line when it is
/// not empty.
///
/// # Errors
///
/// Returns a `TemplateError` if either template fails to expand.
pub fn expand_message(
    subject: &str,
    body: &str,
    context: &TemplateContext,
) -> Result<String, TemplateError> {
    let mut message = expand(subject.trim(), context)?;
    let body = expand(body, context)?;
    if !body.trim().is_empty() {
        message.push_str("\n\n");
        message.push_str(&body);
    }
    Ok(message)
}
