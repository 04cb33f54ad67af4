//! # Error Handling for HtmlSift
//!
//! This module defines the error taxonomy for the HtmlSift conversion
//! pipeline. The `thiserror` crate is used to derive display and source
//! implementations so every failure carries the offending path and a
//! human-readable reason.
//!
//! Errors fall into two groups:
//!
//! - **Fatal** errors abort the run: configuration, output directory,
//!   directory walk and cleanup failures.
//! - **Per-file** errors are logged and the pipeline moves on to the next
//!   input: read, parse, write, conversion and post-process write failures.

use std::path::PathBuf;
use thiserror::Error;

/// Process exit code for fatal failures raised before or during the walk.
pub const EXIT_FAILURE: i32 = 1;

/// Process exit code reserved for a failed post-run cleanup.
pub const EXIT_CLEANUP_FAILURE: i32 = 2;

/// A unified result type for the HtmlSift library.
///
/// This type alias simplifies function signatures by defining a result type that always uses `HtmlSiftError` as the error variant.
pub type Result<T> = std::result::Result<T, HtmlSiftError>;

/// The main error type for HtmlSift, encompassing all potential error cases.
#[derive(Error, Debug)]
pub enum HtmlSiftError {
    /// Error related to configuration loading or validation.
    #[error("Configuration error: {message}.")]
    ConfigError {
        /// Detailed description of the configuration error.
        message: String,
        /// Optional path of the configuration file that caused the error.
        path: Option<PathBuf>,
    },

    /// The output directory could not be created or inspected.
    #[error("Output directory error at `{path:?}`: {source}")]
    DirectoryError {
        /// The output directory.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The input tree could not be enumerated.
    #[error("Failed to walk `{path:?}`: {message}")]
    DirectoryWalkError {
        /// The input root being walked.
        path: PathBuf,
        /// Description of the walk failure.
        message: String,
    },

    /// An input or converted file could not be read.
    #[error("Failed to read `{path:?}`: {source}")]
    ReadError {
        /// The file that could not be read.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The HTML parser rejected the input.
    #[error("Failed to parse HTML in `{path:?}`: {message}")]
    ParseError {
        /// The file being parsed.
        path: PathBuf,
        /// Description of the parse failure.
        message: String,
    },

    /// The assembled intermediate document could not be written.
    #[error("Failed to write `{path:?}`: {source}")]
    WriteError {
        /// The intermediate file path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The external converter could not be run or exited unsuccessfully.
    #[error("Conversion of `{path:?}` failed: {message}")]
    ConversionError {
        /// The document handed to the converter.
        path: PathBuf,
        /// Description of the converter failure.
        message: String,
    },

    /// The final markdown document could not be written.
    #[error("Failed to write processed document `{path:?}`: {source}")]
    PostProcessWriteError {
        /// The output document path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Intermediate files could not be removed after the run.
    #[error("Failed to clean up intermediates under `{path:?}`: {message}")]
    CleanupError {
        /// The input root being cleaned.
        path: PathBuf,
        /// Description of the cleanup failure.
        message: String,
    },

    /// IO error encountered during file operations.
    #[error("File IO error at `{path:?}`: {source}")]
    IOError {
        /// Path associated with the IO error.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Error related to template rendering.
    #[error(
        "Template rendering error: {message} in template `{template}`."
    )]
    TemplateRenderingError {
        /// Description of the template rendering error.
        message: String,
        /// The template identifier associated with the error.
        template: String,
    },

    /// General internal error.
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<std::io::Error> for HtmlSiftError {
    /// Converts a standard IO error into a `HtmlSiftError::IOError` with an empty path.
    fn from(source: std::io::Error) -> Self {
        HtmlSiftError::IOError {
            path: PathBuf::new(),
            source,
        }
    }
}

impl HtmlSiftError {
    /// Creates a `ConfigError` with a specific message.
    ///
    /// # Parameters
    /// - `message`: A description of the configuration error.
    /// - `path`: Optional path of the configuration file causing the error.
    pub fn config_error<S: Into<String>>(
        message: S,
        path: Option<PathBuf>,
    ) -> Self {
        HtmlSiftError::ConfigError {
            message: message.into(),
            path,
        }
    }

    /// Creates a `ConversionError` for the document at `path`.
    pub fn conversion_error<S: Into<String>>(
        path: PathBuf,
        message: S,
    ) -> Self {
        HtmlSiftError::ConversionError {
            path,
            message: message.into(),
        }
    }

    /// Creates a `TemplateRenderingError` with a message and template name.
    pub fn template_rendering_error<S: Into<String>>(
        message: S,
        template: &str,
    ) -> Self {
        HtmlSiftError::TemplateRenderingError {
            message: message.into(),
            template: template.to_string(),
        }
    }

    /// Creates a general internal error with a custom message.
    pub fn internal_error<S: Into<String>>(message: S) -> Self {
        HtmlSiftError::InternalError(message.into())
    }

    /// Returns `true` for errors that only affect a single input file.
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            HtmlSiftError::ReadError { .. }
                | HtmlSiftError::ParseError { .. }
                | HtmlSiftError::WriteError { .. }
                | HtmlSiftError::ConversionError { .. }
                | HtmlSiftError::PostProcessWriteError { .. }
                | HtmlSiftError::TemplateRenderingError { .. }
        )
    }

    /// Maps a fatal error to the process exit code.
    pub fn exit_code(&self) -> i32 {
        match self {
            HtmlSiftError::CleanupError { .. } => EXIT_CLEANUP_FAILURE,
            _ => EXIT_FAILURE,
        }
    }
}
