// Copyright © 2024 HtmlSift. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Command-line interface for HtmlSift
//!
//! This module defines the arguments accepted by the `htmlsift` binary and
//! converts parsed matches into a typed [`CliArgs`].
//!
//! # Examples
//!
//! ```
//! use htmlsift::cli;
//!
//! let matches = cli::build().get_matches_from(vec![
//!     "htmlsift",
//!     "site",
//!     "content/posts",
//!     "travel",
//!     "japan",
//!     "--timeout",
//!     "60",
//! ]);
//!
//! let args = cli::CliArgs::from_matches(&matches).unwrap();
//! assert_eq!(args.category, "travel");
//! assert_eq!(args.timeout, Some(60));
//! ```

use crate::core::error::{HtmlSiftError, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use log::debug;
use std::path::PathBuf;

/// The current version of HtmlSift, as defined in `Cargo.toml`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Builds and configures the HtmlSift command-line interface.
pub fn build() -> Command {
    debug!("Building CLI command structure");

    Command::new("htmlsift")
        .author("HtmlSift Contributors")
        .about("Extracts the content of HTML pages into markdown with front matter.")
        .version(VERSION)
        .arg(
            Arg::new("input_dir")
                .help("Directory searched recursively for .html files")
                .required(true)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("output_dir")
                .help("Directory receiving the markdown files")
                .required(true)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("category")
                .help("Category written into every front matter block")
                .required(true)
                .value_parser(value_parser!(String)),
        )
        .arg(
            Arg::new("tag")
                .help("Tag written into every front matter block")
                .required(true)
                .value_parser(value_parser!(String)),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Increase log output (-v debug, -vv trace)")
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("TOML configuration file")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("converter")
                .long("converter")
                .help("Converter executable (default: pandoc)")
                .value_parser(value_parser!(String)),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .help("Kill the converter after this many seconds")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("keep_intermediate")
                .long("keep-intermediate")
                .help("Leave the *_processed.html files in place")
                .action(ArgAction::SetTrue),
        )
        .after_help(
            "\x1b[1;4mLicense:\x1b[0m\n  The project is licensed under the terms of \
             both the MIT license and the Apache License (Version 2.0).",
        )
}

/// Parsed command-line arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    /// Root searched for HTML files.
    pub input_dir: PathBuf,
    /// Destination of the markdown files.
    pub output_dir: PathBuf,
    /// Front matter category.
    pub category: String,
    /// Front matter tag.
    pub tag: String,
    /// Number of `-v` flags.
    pub verbose: u8,
    /// Optional TOML configuration file.
    pub config: Option<PathBuf>,
    /// Converter executable override.
    pub converter: Option<String>,
    /// Converter timeout override, in seconds.
    pub timeout: Option<u64>,
    /// Skip cleanup of intermediate files.
    pub keep_intermediate: bool,
}

impl CliArgs {
    /// Extracts typed arguments from matches produced by [`build`].
    pub fn from_matches(matches: &ArgMatches) -> Result<Self> {
        Ok(Self {
            input_dir: required::<PathBuf>(matches, "input_dir")?,
            output_dir: required::<PathBuf>(matches, "output_dir")?,
            category: required::<String>(matches, "category")?,
            tag: required::<String>(matches, "tag")?,
            verbose: matches.get_count("verbose"),
            config: matches.get_one::<PathBuf>("config").cloned(),
            converter: matches.get_one::<String>("converter").cloned(),
            timeout: matches.get_one::<u64>("timeout").copied(),
            keep_intermediate: matches.get_flag("keep_intermediate"),
        })
    }

    /// Returns the log filter implied by the `-v` count.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

fn required<T>(matches: &ArgMatches, id: &str) -> Result<T>
where
    T: Clone + Send + Sync + 'static,
{
    matches.get_one::<T>(id).cloned().ok_or_else(|| {
        HtmlSiftError::internal_error(format!("Missing argument: {}", id))
    })
}
