// Copyright © 2024 HtmlSift. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # HtmlSift CLI
//!
//! This is the main entry point for the HtmlSift command-line interface.
//! It parses arguments, initializes the logger, loads configuration and runs
//! the conversion pipeline over the input directory.

use anyhow::Context;
use env_logger::Env;
use htmlsift::cli::{self, CliArgs};
use htmlsift::core::config::ConfigBuilder;
use htmlsift::core::error::{HtmlSiftError, EXIT_FAILURE};
use htmlsift::{PandocConverter, Pipeline, PipelineSettings};
use log::info;
use std::process;

/// Environment variable prefix for configuration overrides.
const ENV_PREFIX: &str = "HTMLSIFT_";

/// Loads configuration and runs the pipeline.
///
/// Per-file failures are logged by the pipeline and do not surface here;
/// only configuration, directory and cleanup failures do.
fn run(args: &CliArgs) -> anyhow::Result<()> {
    let mut builder = ConfigBuilder::new().with_env_prefix(ENV_PREFIX);
    if let Some(path) = &args.config {
        builder = builder.with_file(path);
    }
    if let Some(program) = &args.converter {
        builder = builder.with_override("converter.program", program.clone());
    }
    if let Some(timeout) = args.timeout {
        builder =
            builder.with_override("converter.timeout_secs", timeout.to_string());
    }
    if args.keep_intermediate {
        builder = builder.with_override("output.keep_intermediate", true);
    }

    let config = builder
        .build()
        .context("Failed to load HtmlSift configuration")?;
    let config = config.read();

    let settings = PipelineSettings::new(
        &args.input_dir,
        &args.output_dir,
        &args.category,
        &args.tag,
    )
    .with_config(&config);
    let converter = PandocConverter::from_config(&config.converter);

    let pipeline = Pipeline::new(settings, Box::new(converter))
        .context("Failed to initialise the pipeline")?;
    let report = pipeline.run().context("Failed to process input directory")?;

    info!(
        "Processed {} file(s), {} failed",
        report.processed.len(),
        report.failed.len()
    );
    Ok(())
}

/// The main entry point for the HtmlSift CLI.
fn main() {
    let matches = match cli::build().try_get_matches() {
        Ok(matches) => matches,
        Err(err) => {
            // Help and version go to stdout and are not failures.
            let code = if err.use_stderr() { EXIT_FAILURE } else { 0 };
            let _ = err.print();
            process::exit(code);
        }
    };

    let args = match CliArgs::from_matches(&matches) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("Error: {}", err);
            process::exit(EXIT_FAILURE);
        }
    };

    env_logger::Builder::from_env(
        Env::default().default_filter_or(args.log_level()),
    )
    .init();

    if let Err(err) = run(&args) {
        eprintln!("Error: {:#}", err);
        let code = err
            .downcast_ref::<HtmlSiftError>()
            .map_or(EXIT_FAILURE, HtmlSiftError::exit_code);
        process::exit(code);
    }
}
