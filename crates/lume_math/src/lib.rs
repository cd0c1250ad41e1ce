// Re-export glam for convenience
pub use glam::*;

// Lume math types
mod approx;
mod interval;
mod ray;

pub use approx::{near_zero, unit_vector, ApproxEq, VEC_TOLERANCE};
pub use interval::Interval;
pub use ray::Ray;
