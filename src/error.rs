//! Errors that abort a run.
//!
//! Per-file problems never surface here; they are collected in the run report.

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::library::ScanError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Writing progress lines failed.
    #[error("output error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
