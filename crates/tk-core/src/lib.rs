//! tk-core: stable foundation for thermokit.
//!
//! Contains:
//! - units (uom SI types + constructors)
//! - numeric (Real + tolerances + float helpers)
//! - error (the shared error taxonomy every calculation maps into)

pub mod error;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{TkError, TkResult};
pub use numeric::*;
pub use units::*;
