//! Output schema versioning.

/// Schema version stamped on every JSON payload written to stdout.
///
/// Bumped whenever a record shape changes incompatibly.
pub const SCHEMA_VERSION: &str = "1.0.0";
