//! # Core Traits Module
//!
//! This module defines the two seams of the HtmlSift pipeline:
//!
//! - [`Transform`]: one ordered pass over converted text
//! - [`DocumentConverter`]: the external document converter, treated as a
//!   black box that reads one path and writes another
//!
//! Both are object safe so the pipeline can hold them boxed and tests can
//! substitute their own implementations.

use std::path::Path;

use crate::core::error::Result;

/// Trait for implementing content transformation operations.
///
/// Text post-processing is expressed as a chain of transforms, each of which
/// consumes the previous pass's output.
///
/// # Type Parameters
///
/// * `Input`: The input type for the transformation
/// * `Output`: The output type produced by the transformation
pub trait Transform: Send + Sync + std::fmt::Debug {
    /// The type of input content for the transformation
    type Input;
    /// The type of output content produced by the transformation
    type Output;

    /// Transforms the input content into the output format.
    fn transform(&self, input: Self::Input) -> Self::Output;
}

/// Trait for invoking an external document converter.
///
/// Implementations read the document at `input` and write the converted
/// text to `output`. Any failure to start the converter, or an unsuccessful
/// exit, must be reported as `HtmlSiftError::ConversionError`.
pub trait DocumentConverter: Send + Sync + std::fmt::Debug {
    /// Converts the document at `input`, writing the result to `output`.
    fn convert(&self, input: &Path, output: &Path) -> Result<()>;
}
