//! # ragdoll-ik
//!
//! Pose solver for draggable skeletons. Move one joint and the rest of the
//! skeleton follows while every bone keeps its rest length.
//!
//! ## Features
//! - Hierarchical FABRIK-style relaxation over a rooted joint tree
//! - Skeletons from JSON definitions or a chained builder, with a built-in humanoid
//! - Pointer dragging and LLM tool-call requests snapped to a coordinate grid
//! - Free point plotting driven by the same tool calls
//! - Renderer-agnostic instance data for joints, bones and grid planes
//! - Cross-platform: Native + WASM support
//!
//! ## Example
//! ```rust
//! use ragdoll_ik::ik::{FabrikSolver, Skeleton};
//! use glam::Vec3;
//!
//! let skeleton = Skeleton::builder()
//!     .root("root", Vec3::ZERO)
//!     .child("mid", Vec3::Y, "root")
//!     .child("tip", Vec3::new(0.0, 2.0, 0.0), "mid")
//!     .build()
//!     .unwrap();
//!
//! let tip = skeleton.joint("tip").unwrap();
//! let pose = FabrikSolver::solve(&skeleton, &skeleton.rest_pose(), tip, Vec3::new(1.0, 2.0, 0.0), 3).unwrap();
//! println!("tip at {}", pose.get(tip));
//! ```

pub mod config;
pub mod error;
pub mod grid;
pub mod ik;
pub mod interaction;
pub mod math;
pub mod render;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::SolverConfig;
pub use error::{ConfigError, RequestError, SolveError};
pub use grid::{GridBox, Provider, Suggestion};
pub use ik::{
    BoneLengthTable, FabrikSolver, Humanoid, JointId, Pose, Skeleton, SkeletonDefinition,
    SolveResult, Topology,
};
pub use interaction::{DragController, MoveRequest, PlotSession, PoseSession};
