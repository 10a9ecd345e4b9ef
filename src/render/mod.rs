//! Display data module
//!
//! Camera math and per-frame instance lists for whatever renderer the host
//! uses; nothing here talks to a GPU.

pub mod camera;
pub mod scene;

pub use camera::Camera;
pub use scene::{
    bone_transform, grid_instances, point_instances, skeleton_instances, Instance, InstanceKind,
    PLOT_PALETTE,
};
