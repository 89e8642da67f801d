//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and passed into [`crate::EmlService`].
//! Nothing in this crate reads environment variables while producing a record.

use crate::constants::DEFAULT_SNAPSHOT_FILENAME;
use crate::{EmlError, EmlResult};
use eml::{RenderOptions, XmlWriter};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    snapshot_path: PathBuf,
    render_options: RenderOptions,
}

impl CoreConfig {
    /// Create a new `CoreConfig`, rejecting an empty snapshot path or unusable render options.
    pub fn new(snapshot_path: PathBuf, render_options: RenderOptions) -> EmlResult<Self> {
        if snapshot_path.as_os_str().is_empty() {
            return Err(EmlError::InvalidInput(
                "snapshot_path cannot be empty".into(),
            ));
        }
        XmlWriter::new(render_options.clone())?;

        Ok(Self {
            snapshot_path,
            render_options,
        })
    }

    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }

    pub fn render_options(&self) -> &RenderOptions {
        &self.render_options
    }
}

/// Resolve the snapshot file without reading environment variables.
///
/// If `override_path` is provided it must be an existing file. Otherwise
/// `eml-snapshot.yaml` in the current working directory is used when present.
pub fn resolve_snapshot_path(override_path: Option<PathBuf>) -> EmlResult<PathBuf> {
    if let Some(path) = override_path {
        if path.is_file() {
            return Ok(path);
        }
        return Err(EmlError::InvalidInput(format!(
            "snapshot override {} is not a file",
            path.display()
        )));
    }

    let cwd_relative = PathBuf::from(DEFAULT_SNAPSHOT_FILENAME);
    if cwd_relative.is_file() {
        return Ok(cwd_relative);
    }

    Err(EmlError::InvalidInput(format!(
        "could not locate {DEFAULT_SNAPSHOT_FILENAME} in the working directory"
    )))
}

/// Parse an indent width from an optional string value.
///
/// `None` or blank input keeps the default width.
pub fn indent_from_env_value(value: Option<String>) -> EmlResult<usize> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    match value {
        None => Ok(RenderOptions::default().indent),
        Some(v) => v
            .parse::<usize>()
            .map_err(|e| EmlError::InvalidInput(format!("indent {v:?}: {e}"))),
    }
}
