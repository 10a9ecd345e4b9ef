//! Serializable skeleton description supplied by the host application.
//!
//! A definition carries the three construction inputs separately: the rest
//! pose (which also fixes the joint order), the bone list and the
//! parent/children hierarchy.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::joint::Humanoid;
use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointSpec {
    pub name: String,
    pub position: Vec3,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchySpec {
    pub joint: String,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub children: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkeletonDefinition {
    pub rest_pose: Vec<JointSpec>,
    pub bones: Vec<(String, String)>,
    pub hierarchy: Vec<HierarchySpec>,
}

impl SkeletonDefinition {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The default T-pose-like humanoid rig, rooted at the pelvis.
    pub fn humanoid() -> Self {
        use Humanoid::*;

        let rest = [
            (Head, Vec3::new(0.0, 1.6, 0.0)),
            (Neck, Vec3::new(0.0, 1.4, 0.0)),
            (LeftShoulder, Vec3::new(-0.3, 1.2, 0.0)),
            (RightShoulder, Vec3::new(0.3, 1.2, 0.0)),
            (LeftElbow, Vec3::new(-0.5, 0.8, 0.0)),
            (RightElbow, Vec3::new(0.5, 0.8, 0.0)),
            (LeftWrist, Vec3::new(-0.6, 0.4, 0.0)),
            (RightWrist, Vec3::new(0.6, 0.4, 0.0)),
            (Spine, Vec3::new(0.0, 0.8, 0.0)),
            (Pelvis, Vec3::ZERO),
            (LeftHip, Vec3::new(-0.15, -0.1, 0.0)),
            (RightHip, Vec3::new(0.15, -0.1, 0.0)),
            (LeftKnee, Vec3::new(-0.15, -0.6, 0.0)),
            (RightKnee, Vec3::new(0.15, -0.6, 0.0)),
            (LeftAnkle, Vec3::new(-0.15, -1.2, 0.0)),
            (RightAnkle, Vec3::new(0.15, -1.2, 0.0)),
        ];

        let bones = [
            (Head, Neck),
            (Neck, Spine),
            (Neck, LeftShoulder),
            (Neck, RightShoulder),
            (LeftShoulder, LeftElbow),
            (LeftElbow, LeftWrist),
            (RightShoulder, RightElbow),
            (RightElbow, RightWrist),
            (Spine, Pelvis),
            (Pelvis, LeftHip),
            (Pelvis, RightHip),
            (LeftHip, LeftKnee),
            (LeftKnee, LeftAnkle),
            (RightHip, RightKnee),
            (RightKnee, RightAnkle),
        ];

        let hierarchy: [(Humanoid, Option<Humanoid>, &[Humanoid]); Humanoid::COUNT] = [
            (Pelvis, None, &[Spine, LeftHip, RightHip]),
            (Spine, Some(Pelvis), &[Neck]),
            (Neck, Some(Spine), &[Head, LeftShoulder, RightShoulder]),
            (Head, Some(Neck), &[]),
            (LeftShoulder, Some(Neck), &[LeftElbow]),
            (LeftElbow, Some(LeftShoulder), &[LeftWrist]),
            (LeftWrist, Some(LeftElbow), &[]),
            (RightShoulder, Some(Neck), &[RightElbow]),
            (RightElbow, Some(RightShoulder), &[RightWrist]),
            (RightWrist, Some(RightElbow), &[]),
            (LeftHip, Some(Pelvis), &[LeftKnee]),
            (LeftKnee, Some(LeftHip), &[LeftAnkle]),
            (LeftAnkle, Some(LeftKnee), &[]),
            (RightHip, Some(Pelvis), &[RightKnee]),
            (RightKnee, Some(RightHip), &[RightAnkle]),
            (RightAnkle, Some(RightKnee), &[]),
        ];

        Self {
            rest_pose: rest
                .iter()
                .map(|(joint, position)| JointSpec {
                    name: joint.as_str().to_owned(),
                    position: *position,
                })
                .collect(),
            bones: bones
                .iter()
                .map(|(a, b)| (a.as_str().to_owned(), b.as_str().to_owned()))
                .collect(),
            hierarchy: hierarchy
                .iter()
                .map(|(joint, parent, children)| HierarchySpec {
                    joint: joint.as_str().to_owned(),
                    parent: parent.map(|p| p.as_str().to_owned()),
                    children: children.iter().map(|c| c.as_str().to_owned()).collect(),
                })
                .collect(),
        }
    }
}
