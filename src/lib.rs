// Copyright © 2024 HtmlSift. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # HtmlSift Library
//!
//! HtmlSift walks a directory of legacy HTML pages, keeps only the content
//! elements worth migrating, hands them to pandoc and cleans the resulting
//! markdown before prefixing it with a static-site front matter block.
//!
//! The stages are exposed individually so they can be reused or tested on
//! their own:
//!
//! - [`classify`] decides which elements are kept
//! - [`extract`] parses a page and serializes the kept subtrees
//! - [`template`] renders the HTML shell and the front matter block
//! - [`convert`] runs the external converter
//! - [`postprocess`] strips converter artefacts from the markdown
//! - [`frontmatter`] derives per-document metadata
//! - [`pipeline`] drives all of the above over a directory tree

#![doc = include_str!("../README.md")]
#![doc(html_root_url = "https://docs.rs/htmlsift")]
#![crate_name = "htmlsift"]
#![crate_type = "lib"]

/// Module containing core utilities, such as configuration and error handling.
pub mod core;

/// Provides command-line interface utilities.
pub mod cli;

/// Element classification rules.
pub mod classify;

/// External converter adapter.
pub mod convert;

/// HTML parsing and fragment extraction.
pub mod extract;

/// Front matter derivation.
pub mod frontmatter;

/// Per-file pipeline and directory driver.
pub mod pipeline;

/// Markdown post-processing passes.
pub mod postprocess;

/// File helpers shared by the pipeline steps.
pub mod process;

/// Provides template rendering utilities.
pub mod template;

pub use crate::convert::PandocConverter;
pub use crate::core::config::{Config, ConfigBuilder};
pub use crate::core::error::{HtmlSiftError, Result};
pub use crate::core::traits::{DocumentConverter, Transform};
pub use crate::extract::{extract_fragments, parse_html, Fragment};
pub use crate::frontmatter::FrontMatter;
pub use crate::pipeline::{Pipeline, PipelineSettings, RunReport};
pub use crate::postprocess::{post_process, PostProcessor};
