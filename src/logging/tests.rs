// gitarchive: archive test results into Git
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{LogConfig, LogLevel};

#[test]
fn test_log_level_from_number_and_name() {
    let parsed: Vec<_> = ["0", "3", "debug", "TRACE", " warn "]
        .into_iter()
        .map(|s| s.parse::<LogLevel>().unwrap().to_string())
        .collect();
    assert_eq!(parsed, ["off", "info", "debug", "trace", "warn"]);
}

#[test]
fn test_log_level_rejects_out_of_range() {
    insta::assert_snapshot!(
        "6".parse::<LogLevel>().unwrap_err().to_string(),
        @"invalid value for 'log_level' in section '[global]': log level must be 0-5, got 6"
    );
    assert!("verbose".parse::<LogLevel>().is_err());
    assert_eq!(LogLevel::from_u8(9), None);
}

#[test]
fn test_log_level_deserializes_both_forms() {
    #[derive(serde::Deserialize)]
    struct Levels {
        a: LogLevel,
        b: LogLevel,
    }
    let levels: Levels = serde_json::from_str(r#"{"a": 4, "b": "error"}"#).unwrap();
    assert_eq!(levels.a, LogLevel::DEBUG);
    assert_eq!(levels.b, LogLevel::ERROR);
}

#[test]
fn test_log_config_defaults() {
    let config = LogConfig::default();
    assert_eq!(config.console_level(), LogLevel::WARN);
    assert_eq!(config.file_level(), LogLevel::DEBUG);
    assert_eq!(config.log_file(), None);
    assert!(!config.show_target());
}
