//! datalens CLI.

use std::io::{self, IsTerminal};

use anyhow::Result;
use clap::{ColorChoice, Parser};
use datalens_cli::commands::{
    csv_overrides, inspect_file, load_settings, resolve, summarize_key,
};
use datalens_cli::logging::{LogConfig, LogFormat, init_logging};
use datalens_cli::render::print_summary;
use datalens_core::{DataError, LoadOptions};
use datalens_model::DatasetSummary;
use tracing::level_filters::LevelFilter;

mod cli;

use crate::cli::{Cli, Command, InspectArgs, LogFormatArg, LogLevelArg, SummarizeArgs};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let result = match cli.command {
        Command::Summarize(args) => run_summarize(args),
        Command::Inspect(args) => run_inspect(args),
        Command::Resolve(args) => resolve(&args.registry, &args.dashboard, &args.charts).map(
            |resolution| {
                println!("{}\t{}", resolution.dataset_id, resolution.key);
            },
        ),
    };
    let exit_code = match result {
        Ok(()) => 0,
        Err(error) => {
            match error.chain().find_map(|cause| cause.downcast_ref::<DataError>()) {
                Some(data_error) => eprintln!("error [{}]: {error:#}", data_error.kind()),
                None => eprintln!("error: {error:#}"),
            }
            1
        }
    };
    std::process::exit(exit_code);
}

fn run_summarize(args: SummarizeArgs) -> Result<()> {
    let settings = load_settings(args.config.as_deref())?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let summary = runtime.block_on(summarize_key(
        &args.key,
        args.format.map(Into::into),
        settings,
    ))?;
    emit(&summary, args.json)
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    let settings = load_settings(args.config.as_deref())?;
    let options = LoadOptions {
        csv: csv_overrides(&settings.csv, args.encoding, args.delimiter, args.max_rows),
        ..LoadOptions::default()
    };
    let summary = inspect_file(
        &args.file,
        args.format.map(Into::into),
        &settings,
        &options,
    )?;
    emit(&summary, args.json)
}

fn emit(summary: &DatasetSummary, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
    } else {
        print_summary(summary);
    }
    Ok(())
}

/// Explicit `--log-level` wins over `-v`/`-q`; either one disables `RUST_LOG`.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let level_filter = cli.log_level.map_or_else(
        || cli.verbosity.tracing_level_filter(),
        |level| match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        },
    );
    let with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    LogConfig {
        level_filter,
        use_env_filter: !cli.verbosity.is_present() && cli.log_level.is_none(),
        with_ansi,
        format: match cli.log_format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        },
        log_file: cli.log_file.clone(),
        ..LogConfig::default()
    }
}
