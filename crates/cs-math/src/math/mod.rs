//! Core math modules.

pub mod entropy;
pub mod smoothing;
pub mod stable;
pub mod summary;
