// gitarchive: archive test results into Git
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Tag number allocation.
//!
//! ```text
//! "{branch}/run-{tag_number}"   context { branch: "main" }
//!         |
//!         v  literals and known fields escaped, slot -> ([0-9]{1,5})
//! ^main/run\-([0-9]{1,5})$
//!         |
//!         v  against `git tag --list`
//! main/run-0, main/run-3, main/run-7   -->  tag_number = 8
//! ```
//!
//! Allocation reads the tag list and creates the tag later; two archivers
//! racing on one repository can pick the same number.

use regex::Regex;
use tracing::debug;

use crate::archive::template::{
    Segment, TemplateContext, expand, expand_message, parse,
};
use crate::error::{ArchiveResult, TagError};
use crate::git::Repository;

/// Context key the allocator fills in.
pub const TAG_NUMBER: &str = "tag_number";

/// Recognizes tags produced by one name template.
#[derive(Debug)]
pub(crate) struct TagMatcher {
    regex: Regex,
}

impl TagMatcher {
    /// Build a matcher for `pattern`, with every field except `tag_number`
    /// fixed to its value in `context`.
    pub(crate) fn new(pattern: &str, context: &TemplateContext) -> ArchiveResult<Self> {
        let mut source = String::from("^");
        for segment in parse(pattern)? {
            match segment {
                Segment::Literal(text) => source.push_str(&regex::escape(&text)),
                Segment::Field(field) if field == TAG_NUMBER => {
                    source.push_str("([0-9]{1,5})");
                }
                Segment::Field(field) => {
                    let value = context.lookup(pattern, &field)?;
                    source.push_str(&regex::escape(&value.to_string()));
                }
            }
        }
        source.push('$');

        let regex = Regex::new(&source).map_err(|source| TagError::Matcher {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self { regex })
    }

    /// Number carried by `tag`, if it was produced by this template.
    ///
    /// When the template has several `{tag_number}` slots they must all
    /// hold the same number.
    pub(crate) fn number(&self, tag: &str) -> Option<u32> {
        let captures = self.regex.captures(tag)?;
        let mut numbers = captures
            .iter()
            .skip(1)
            .map(|m| m.and_then(|m| m.as_str().parse::<u32>().ok()));
        let first = numbers.next()??;
        numbers.all(|n| n == Some(first)).then_some(first)
    }

    /// One past the highest number among `tags`, or 0 if none match.
    pub(crate) fn next_number<'a>(&self, tags: impl IntoIterator<Item = &'a str>) -> u32 {
        tags.into_iter()
            .filter_map(|tag| self.number(tag))
            .max()
            .map_or(0, |n| n + 1)
    }
}

/// Expand `name_pattern` into a tag name, allocating `tag_number` first
/// unless `context` already carries one.
///
/// Returns the name together with the context used, so the tag message can
/// reference the same number.
///
/// # Errors
///
/// Returns an `ArchiveError` if the template is invalid or the existing tags
/// cannot be listed.
pub fn allocate_tag_name(
    repo: &Repository<'_>,
    name_pattern: &str,
    context: &TemplateContext,
) -> ArchiveResult<(String, TemplateContext)> {
    let mut context = context.clone();
    if !context.contains_key(TAG_NUMBER) {
        let matcher = TagMatcher::new(name_pattern, &context)?;
        let tags = repo.tags().map_err(TagError::ListTags)?;
        let number = matcher.next_number(tags.iter().map(String::as_str));
        debug!(pattern = name_pattern, existing = tags.len(), number, "allocated tag number");
        context.insert(TAG_NUMBER, number);
    }
    let name = expand(name_pattern, &context)?;
    Ok((name, context))
}

/// Allocate a tag name and render the tag message with the same context.
///
/// # Errors
///
/// Returns an `ArchiveError` if any template fails to expand or the tag
/// list cannot be read.
pub fn expand_tag_strings(
    repo: &Repository<'_>,
    name_pattern: &str,
    msg_subject: &str,
    msg_body: &str,
    context: &TemplateContext,
) -> ArchiveResult<(String, String)> {
    let (name, context) = allocate_tag_name(repo, name_pattern, context)?;
    let message = expand_message(msg_subject, msg_body, &context)?;
    Ok((name, message))
}
