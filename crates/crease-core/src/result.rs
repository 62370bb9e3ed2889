//! Result type alias for style-checking operations

use crate::error::CreaseError;

/// Standard Result type for style-checking operations
pub type Result<T> = std::result::Result<T, CreaseError>;
