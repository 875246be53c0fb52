// gitarchive: archive test results into Git
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Config --> Logging --> Command Dispatch
//!   Archive | Options | Inis | Version
//! ```

use std::process::ExitCode;

use gitarchive::cli::global::GlobalOptions;
use gitarchive::cli::{self, Command};
use gitarchive::cmd::archive::run_archive_command;
use gitarchive::cmd::config::{run_inis_command, run_options_command};
use gitarchive::config::Config;
use gitarchive::config::loader::ConfigLoader;
use gitarchive::logging::{LogConfig, LogGuard, init_logging};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Local configuration file picked up from the working directory.
const LOCAL_CONFIG: &str = "gitarchive.toml";

/// Prefix of `GITARCHIVE__SECTION__KEY` environment overrides.
const ENV_PREFIX: &str = "GITARCHIVE";

fn main() -> ExitCode {
    let cli = cli::parse();

    let result = match &cli.command {
        Some(Command::Version) => {
            handle_version_command();
            Ok(())
        }
        Some(Command::Inis) => {
            run_inis_command(&build_config_loader(&cli.global).format_loaded_files());
            Ok(())
        }
        Some(command) => load_config(&cli.global).and_then(|config| {
            let _log_guard = start_logging(&config)?;
            dispatch_command(command, &config)
        }),
        None => {
            eprintln!("No command specified. Use --help for usage information.");
            Err(anyhow::anyhow!("No command specified"))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn dispatch_command(command: &Command, config: &Config) -> gitarchive::error::Result<()> {
    match command {
        Command::Archive(args) => run_archive_command(args, config),
        Command::Options => {
            run_options_command(config);
            Ok(())
        }
        Command::Version | Command::Inis => Ok(()),
    }
}

fn handle_version_command() {
    println!("{}", env!("CARGO_PKG_VERSION"));
}

fn build_log_config(config: &Config) -> LogConfig {
    LogConfig::builder()
        .with_console_level(config.global.output_log_level)
        .with_file_level(config.global.file_log_level)
        .maybe_with_log_file(
            config
                .global
                .log_file
                .as_ref()
                .map(|p| p.display().to_string()),
        )
        .build()
}

fn start_logging(config: &Config) -> gitarchive::error::Result<LogGuard> {
    init_logging(&build_log_config(config))
}

fn build_config_loader(global: &GlobalOptions) -> ConfigLoader {
    let mut loader = ConfigLoader::new().add_toml_file_optional(LOCAL_CONFIG);
    for ini_path in &global.inis {
        loader = loader.add_toml_file(ini_path);
    }
    loader.with_env_prefix(ENV_PREFIX)
}

fn load_config(global: &GlobalOptions) -> gitarchive::error::Result<Config> {
    let mut loader = build_config_loader(global);
    for (key, value) in global.to_config_overrides() {
        loader = loader.set(key, value)?;
    }
    loader
        .build()
        .map_err(|e| e.context("failed to load configuration"))
}
