//! Result type alias for adaptcomp operations

use crate::Error;

/// Result type alias for adaptcomp operations
pub type Result<T> = std::result::Result<T, Error>;
