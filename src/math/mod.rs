//! Math utilities module
//!
//! Vector helpers used by the solver plus the pointer ray used for dragging.

mod ray;
mod vector;

pub use ray::Ray;
pub use vector::{add, distance, length, normalize, reach, scale, sub};

// Re-export commonly used glam types
pub use glam::{Mat4, Quat, Vec3, Vec4};
