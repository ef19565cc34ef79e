//! Cascade statistics math utilities.

pub mod math;

pub use math::entropy::*;
pub use math::smoothing;
pub use math::stable::*;
pub use math::summary::Summary;
