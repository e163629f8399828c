//! Error kinds. These are reported at the boundary (constructor or
//! top-level query); recoverable errors are never swallowed silently or
//! turned into a panic.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("allocation failure: {0}")]
    AllocationFailure(String),

    #[error("not implemented: {0}")]
    NotImplemented(String),

    /// Not currently raised anywhere. The Sellmeier near-resonance
    /// division-by-zero is logged rather than reported as an error (see
    /// `core::sellmeier::Sellmeier::n`); this variant exists so a future
    /// caller can opt into detecting it instead.
    #[error("numeric boundary crossed: {0}")]
    NumericBoundary(String),
}

pub type Result<T> = std::result::Result<T, Error>;
