//! Inverse Kinematics module
//!
//! Skeleton description, rest lengths, poses and the tree solver that keeps
//! bones rigid while a single joint is moved.

pub mod definition;
pub mod joint;
pub mod lengths;
pub mod pose;
pub mod skeleton;
pub mod solver;
pub mod topology;

pub use definition::{HierarchySpec, JointSpec, SkeletonDefinition};
pub use joint::{Bone, Humanoid, JointId};
pub use lengths::BoneLengthTable;
pub use pose::{NamedPosition, Pose};
pub use skeleton::{Skeleton, SkeletonBuilder};
pub use solver::{FabrikSolver, SolveResult, DEFAULT_ITERATIONS};
pub use topology::{Ancestors, Topology};
