use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::joint::JointId;

/// Position of every joint of one skeleton, indexed by [`JointId`].
///
/// A pose is a value: the solver reads one and returns a new one, and nothing
/// outside the crate can move a single joint in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Pose {
    positions: Vec<Vec3>,
}

impl Pose {
    pub(crate) fn from_positions(positions: Vec<Vec3>) -> Self {
        Self { positions }
    }

    /// # Panics
    ///
    /// Panics if `joint` is out of range for this pose.
    pub fn get(&self, joint: JointId) -> Vec3 {
        self.positions[joint.index()]
    }

    pub fn try_get(&self, joint: JointId) -> Option<Vec3> {
        self.positions.get(joint.index()).copied()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (JointId, Vec3)> + '_ {
        self.positions
            .iter()
            .enumerate()
            .map(|(i, p)| (JointId::from_index(i), *p))
    }

    /// Largest per-joint displacement between two poses of the same skeleton.
    /// NaN if either pose holds a non-finite joint.
    pub fn max_displacement(&self, other: &Pose) -> f32 {
        self.positions
            .iter()
            .zip(&other.positions)
            .map(|(a, b)| a.distance(*b))
            .fold(0.0, nan_max)
    }

    /// First joint whose position is not finite.
    pub fn first_non_finite(&self) -> Option<JointId> {
        self.iter().find(|(_, p)| !p.is_finite()).map(|(joint, _)| joint)
    }

    pub(crate) fn into_positions(self) -> Vec<Vec3> {
        self.positions
    }
}

/// `f32::max` drops NaN operands; pose diagnostics must not.
pub(crate) fn nan_max(max: f32, value: f32) -> f32 {
    if value.is_nan() || value > max {
        value
    } else {
        max
    }
}

/// Named joint position, the shape poses take when handed to a renderer or
/// serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedPosition {
    pub name: String,
    pub position: Vec3,
}
