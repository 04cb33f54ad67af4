// Copyright © 2024 HtmlSift. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # File Pipeline Driver
//!
//! Carries each HTML file under the input root through
//! read → parse → extract → assemble → convert → post-process → write,
//! strictly one file at a time. A file failing at one of those stages is
//! logged and skipped. Output directory, directory walk and cleanup failures
//! abort the run, as does any error that is not tied to a single file.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use log::{debug, error, info, warn};
use walkdir::WalkDir;

use crate::core::config::{Config, INTERMEDIATE_MARKER};
use crate::core::error::{HtmlSiftError, Result};
use crate::core::traits::DocumentConverter;
use crate::extract::{extract_fragments, parse_html};
use crate::frontmatter::FrontMatter;
use crate::postprocess::PostProcessor;
use crate::process::{base_name, is_html_file, read_content, write_content};
use crate::template::ShellRenderer;

/// Stages a single file moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileState {
    /// Found by the directory walk.
    Discovered,
    /// Raw bytes loaded.
    Read,
    /// DOM built.
    Parsed,
    /// Fragments collected.
    Extracted,
    /// Shell written next to the input.
    Assembled,
    /// Converter produced markdown.
    Converted,
    /// Markdown cleaned and front matter prepended.
    PostProcessed,
    /// Final document written.
    Written,
}

impl fmt::Display for FileState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Per-run parameters shared by every file.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Root walked for `.html` files.
    pub input_dir: PathBuf,
    /// Directory receiving `<basename>.md` files.
    pub output_dir: PathBuf,
    /// Category echoed into every front matter block.
    pub category: String,
    /// Tag echoed into every front matter block.
    pub tag: String,
    /// Skip the post-run cleanup of intermediates.
    pub keep_intermediate: bool,
    /// Suffix replacing `.html` for the assembled shell.
    pub intermediate_suffix: String,
}

impl PipelineSettings {
    /// Creates settings with default intermediate handling.
    pub fn new<P, Q>(input_dir: P, output_dir: Q, category: &str, tag: &str) -> Self
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let defaults = Config::default();
        Self {
            input_dir: input_dir.as_ref().to_path_buf(),
            output_dir: output_dir.as_ref().to_path_buf(),
            category: category.to_string(),
            tag: tag.to_string(),
            keep_intermediate: defaults.output.keep_intermediate,
            intermediate_suffix: defaults.output.intermediate_suffix,
        }
    }

    /// Applies the `[output]` section of a loaded configuration.
    pub fn with_config(mut self, config: &Config) -> Self {
        self.keep_intermediate = config.output.keep_intermediate;
        self.intermediate_suffix = config.output.intermediate_suffix.clone();
        self
    }

    /// Enables or disables the post-run cleanup.
    pub fn with_keep_intermediate(mut self, keep: bool) -> Self {
        self.keep_intermediate = keep;
        self
    }
}

/// Outcome of a completed run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Output documents written, in processing order.
    pub processed: Vec<PathBuf>,
    /// Inputs that failed, with the reason.
    pub failed: Vec<(PathBuf, String)>,
    /// Number of intermediate files deleted by cleanup.
    pub removed_intermediates: usize,
}

/// Main conversion pipeline.
#[derive(Debug)]
pub struct Pipeline {
    settings: PipelineSettings,
    converter: Box<dyn DocumentConverter>,
    renderer: ShellRenderer,
    post_processor: PostProcessor,
    date: NaiveDate,
}

impl Pipeline {
    /// Creates a pipeline dated with today's local date.
    pub fn new(
        settings: PipelineSettings,
        converter: Box<dyn DocumentConverter>,
    ) -> Result<Self> {
        Ok(Self {
            settings,
            converter,
            renderer: ShellRenderer::new()?,
            post_processor: PostProcessor::default(),
            date: Local::now().date_naive(),
        })
    }

    /// Fixes the front matter date instead of using today's.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    /// Processes every HTML file under the input root, then removes the
    /// intermediates.
    pub fn run(&self) -> Result<RunReport> {
        let _ = prepare_output_dir(&self.settings.output_dir)?;
        let files = discover_html_files(&self.settings.input_dir)?;
        info!(
            "Found {} HTML file(s) under {}",
            files.len(),
            self.settings.input_dir.display()
        );

        let mut report = RunReport::default();
        for path in files {
            match self.process_file(&path) {
                Ok(output) => report.processed.push(output),
                Err(e) if !e.is_per_file() => {
                    error!("Aborting at {}: {}", path.display(), e);
                    return Err(e);
                }
                Err(e) => {
                    error!("Error processing {}: {}", path.display(), e);
                    report.failed.push((path, e.to_string()));
                }
            }
        }

        if self.settings.keep_intermediate {
            info!("Keeping intermediate files");
        } else {
            info!("Deleting processed files...");
            report.removed_intermediates =
                cleanup_intermediates(&self.settings.input_dir)?;
            info!("Deleted {} processed file(s)", report.removed_intermediates);
        }

        Ok(report)
    }

    /// Converts one HTML file, returning the path of the written document.
    pub fn process_file(&self, path: &Path) -> Result<PathBuf> {
        let transition = |state: FileState| {
            debug!("{}: {}", path.display(), state);
        };
        transition(FileState::Discovered);

        let base = base_name(path).ok_or_else(|| {
            HtmlSiftError::internal_error(format!(
                "No file name in {}",
                path.display()
            ))
        })?;
        let intermediate = self.intermediate_path(path, &base);
        let output = self.settings.output_dir.join(format!("{}.md", base));

        let bytes = fs::read(path).map_err(|source| HtmlSiftError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        transition(FileState::Read);

        let dom = parse_html(&bytes).map_err(|e| HtmlSiftError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        transition(FileState::Parsed);

        let fragments = extract_fragments(&dom.document)?;
        transition(FileState::Extracted);

        let shell = self.renderer.render_shell(&fragments)?;
        write_content(&intermediate, &shell, |path, source| {
            HtmlSiftError::WriteError { path, source }
        })?;
        info!("Successfully extracted content to {}", intermediate.display());
        transition(FileState::Assembled);

        self.converter.convert(&intermediate, &output)?;
        info!("Successfully converted to markdown: {}", output.display());
        transition(FileState::Converted);

        let converted = read_content(&output)?;
        let front_matter = FrontMatter::new(
            &base,
            &self.settings.category,
            &self.settings.tag,
            self.date,
        );
        let mut document = self.renderer.render_front_matter(&front_matter)?;
        document.push_str(&self.post_processor.run(&converted));
        transition(FileState::PostProcessed);

        write_content(&output, &document, |path, source| {
            HtmlSiftError::PostProcessWriteError { path, source }
        })?;
        info!("Successfully processed: {}", path.display());
        transition(FileState::Written);

        Ok(output)
    }

    fn intermediate_path(&self, path: &Path, base: &str) -> PathBuf {
        let name = format!("{}{}", base, self.settings.intermediate_suffix);
        match path.parent() {
            Some(parent) => parent.join(name),
            None => PathBuf::from(name),
        }
    }
}

/// Creates the output directory if needed.
///
/// Returns `true` when the directory already existed and was not empty,
/// which is logged as a warning but does not stop the run.
pub fn prepare_output_dir(path: &Path) -> Result<bool> {
    if !path.exists() {
        fs::create_dir_all(path).map_err(|source| {
            HtmlSiftError::DirectoryError {
                path: path.to_path_buf(),
                source,
            }
        })?;
        return Ok(false);
    }

    let mut entries = fs::read_dir(path).map_err(|source| {
        HtmlSiftError::DirectoryError {
            path: path.to_path_buf(),
            source,
        }
    })?;
    let non_empty = entries.next().is_some();
    if non_empty {
        warn!("Output directory {} is not empty", path.display());
    }
    Ok(non_empty)
}

/// Lists regular `.html` files under `root` (any letter case), sorted by
/// path.
///
/// The list is collected in full before any file is processed, so the
/// intermediates written during a run are never picked up.
pub fn discover_html_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| HtmlSiftError::DirectoryWalkError {
            path: root.to_path_buf(),
            message: e.to_string(),
        })?;
        let path = entry.path();
        if !entry.file_type().is_file() || !is_html_file(path) {
            continue;
        }
        files.push(path.to_path_buf());
    }
    Ok(files)
}

/// Deletes every regular file under `root` whose name contains `processed`.
pub fn cleanup_intermediates(root: &Path) -> Result<usize> {
    let cleanup_error = |message: String| HtmlSiftError::CleanupError {
        path: root.to_path_buf(),
        message,
    };

    let mut doomed = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|e| cleanup_error(e.to_string()))?;
        if entry.file_type().is_file()
            && entry.file_name().to_string_lossy().contains(INTERMEDIATE_MARKER)
        {
            doomed.push(entry.into_path());
        }
    }

    for path in &doomed {
        fs::remove_file(path).map_err(|e| {
            cleanup_error(format!("{}: {}", path.display(), e))
        })?;
        debug!("Removed {}", path.display());
    }
    Ok(doomed.len())
}
