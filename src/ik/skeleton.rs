use glam::Vec3;

use super::definition::{HierarchySpec, JointSpec, SkeletonDefinition};
use super::joint::JointId;
use super::lengths::BoneLengthTable;
use super::pose::{nan_max, NamedPosition, Pose};
use super::topology::Topology;
use crate::error::{ConfigError, SolveError};
use crate::math::distance;

/// Immutable skeleton: topology, rest lengths and the rest pose they were
/// measured from.
///
/// Safe to share across threads; every per-session mutable state lives in a
/// [`Pose`].
#[derive(Debug, Clone)]
pub struct Skeleton {
    topology: Topology,
    lengths: BoneLengthTable,
    rest: Pose,
    parent_lengths: Vec<f32>,
}

impl Skeleton {
    pub fn builder() -> SkeletonBuilder {
        SkeletonBuilder::new()
    }

    pub fn humanoid() -> Result<Self, ConfigError> {
        Self::from_definition(&SkeletonDefinition::humanoid())
    }

    pub fn from_definition(def: &SkeletonDefinition) -> Result<Self, ConfigError> {
        let names = def.rest_pose.iter().map(|j| j.name.clone()).collect();
        let topology = Topology::new(names, &def.bones, &def.hierarchy)?;

        let rest: Vec<Vec3> = def.rest_pose.iter().map(|j| j.position).collect();
        if let Some(bad) = def.rest_pose.iter().find(|j| !j.position.is_finite()) {
            return Err(ConfigError::NonFiniteRestPosition(bad.name.clone()));
        }

        let lengths = BoneLengthTable::from_rest_pose(&topology, &rest);

        let parent_lengths = topology
            .joints()
            .map(|joint| match topology.parent(joint) {
                Some(parent) => lengths.get(parent, joint).ok_or_else(|| {
                    ConfigError::MissingBoneLength {
                        parent: topology.name(parent).to_owned(),
                        child: topology.name(joint).to_owned(),
                    }
                }),
                None => Ok(0.0),
            })
            .collect::<Result<Vec<_>, _>>()?;

        log::debug!(
            "skeleton built: {} joints, total bone length {:.3}",
            topology.joint_count(),
            lengths.total_length()
        );

        Ok(Self {
            topology,
            lengths,
            rest: Pose::from_positions(rest),
            parent_lengths,
        })
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn lengths(&self) -> &BoneLengthTable {
        &self.lengths
    }

    pub fn joint_count(&self) -> usize {
        self.topology.joint_count()
    }

    pub fn joint(&self, name: &str) -> Option<JointId> {
        self.topology.joint(name)
    }

    /// Like [`joint`](Self::joint), as a request error for unknown names.
    pub fn resolve(&self, name: &str) -> Result<JointId, SolveError> {
        self.joint(name)
            .ok_or_else(|| SolveError::UnknownJoint(name.to_owned()))
    }

    pub(crate) fn check_joint(&self, joint: JointId) -> Result<(), SolveError> {
        if self.topology.contains(joint) {
            Ok(())
        } else {
            Err(SolveError::JointOutOfRange {
                id: joint.index(),
                count: self.joint_count(),
            })
        }
    }

    pub fn rest_length(&self, a: JointId, b: JointId) -> Result<f32, ConfigError> {
        self.lengths.lookup(&self.topology, a, b)
    }

    /// Rest length of the bone to `joint`'s parent, zero for the root.
    #[inline]
    pub(crate) fn parent_length(&self, joint: JointId) -> f32 {
        self.parent_lengths[joint.index()]
    }

    pub fn rest_pose(&self) -> Pose {
        self.rest.clone()
    }

    /// Rest pose with some joints replaced. Bone lengths stay those of the
    /// rest pose; the next solve pulls the overrides back into shape.
    pub fn initial_pose<I>(&self, overrides: I) -> Result<Pose, SolveError>
    where
        I: IntoIterator<Item = (JointId, Vec3)>,
    {
        let mut positions = self.rest.clone().into_positions();
        for (joint, position) in overrides {
            self.check_joint(joint)?;
            if !position.is_finite() {
                return Err(SolveError::NonFinitePosition(
                    self.topology.name(joint).to_owned(),
                ));
            }
            positions[joint.index()] = position;
        }
        Ok(Pose::from_positions(positions))
    }

    /// Checks that `pose` belongs to this skeleton and holds only finite
    /// positions.
    pub fn check_pose(&self, pose: &Pose) -> Result<(), SolveError> {
        if pose.len() != self.joint_count() {
            return Err(SolveError::PoseMismatch {
                expected: self.joint_count(),
                got: pose.len(),
            });
        }
        match pose.first_non_finite() {
            Some(joint) => Err(SolveError::NonFinitePosition(
                self.topology.name(joint).to_owned(),
            )),
            None => Ok(()),
        }
    }

    pub fn named_pose(&self, pose: &Pose) -> Vec<NamedPosition> {
        pose.iter()
            .filter(|(joint, _)| self.topology.contains(*joint))
            .map(|(joint, position)| NamedPosition {
                name: self.topology.name(joint).to_owned(),
                position,
            })
            .collect()
    }

    /// Worst absolute deviation of any hierarchy edge from its rest length,
    /// NaN when a joint on some edge is not finite.
    pub fn max_length_error(&self, pose: &Pose) -> f32 {
        self.topology
            .joints()
            .filter_map(|joint| {
                let parent = self.topology.parent(joint)?;
                let a = pose.try_get(parent)?;
                let b = pose.try_get(joint)?;
                Some((distance(a, b) - self.parent_length(joint)).abs())
            })
            .fold(0.0, nan_max)
    }
}

/// Chained construction of a skeleton in code.
///
/// Joints hang off previously or later declared parents; children keep the
/// order in which they were added. Every parent link becomes a bone, and
/// [`bone`](Self::bone) adds segments outside the hierarchy.
pub struct SkeletonBuilder {
    joints: Vec<(String, Vec3, Option<String>)>,
    extra_bones: Vec<(String, String)>,
}

impl SkeletonBuilder {
    pub fn new() -> Self {
        Self {
            joints: Vec::new(),
            extra_bones: Vec::new(),
        }
    }

    pub fn root(mut self, name: impl Into<String>, position: Vec3) -> Self {
        self.joints.push((name.into(), position, None));
        self
    }

    pub fn child(
        mut self,
        name: impl Into<String>,
        position: Vec3,
        parent: impl Into<String>,
    ) -> Self {
        self.joints
            .push((name.into(), position, Some(parent.into())));
        self
    }

    pub fn bone(mut self, a: impl Into<String>, b: impl Into<String>) -> Self {
        self.extra_bones.push((a.into(), b.into()));
        self
    }

    pub fn definition(&self) -> SkeletonDefinition {
        let rest_pose = self
            .joints
            .iter()
            .map(|(name, position, _)| JointSpec {
                name: name.clone(),
                position: *position,
            })
            .collect();

        let hierarchy = self
            .joints
            .iter()
            .map(|(name, _, parent)| HierarchySpec {
                joint: name.clone(),
                parent: parent.clone(),
                children: self
                    .joints
                    .iter()
                    .filter(|(_, _, p)| p.as_deref() == Some(name.as_str()))
                    .map(|(child, _, _)| child.clone())
                    .collect(),
            })
            .collect();

        let bones = self
            .joints
            .iter()
            .filter_map(|(name, _, parent)| parent.clone().map(|p| (p, name.clone())))
            .chain(self.extra_bones.iter().cloned())
            .collect();

        SkeletonDefinition {
            rest_pose,
            bones,
            hierarchy,
        }
    }

    pub fn build(self) -> Result<Skeleton, ConfigError> {
        Skeleton::from_definition(&self.definition())
    }
}

impl Default for SkeletonBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ik::joint::Humanoid;
    use approx::assert_relative_eq;

    #[test]
    fn test_builder_chain() {
        let skeleton = Skeleton::builder()
            .root("root", Vec3::ZERO)
            .child("mid", Vec3::Y, "root")
            .child("tip", Vec3::new(0.0, 2.0, 0.0), "mid")
            .build()
            .unwrap();

        let root = skeleton.joint("root").unwrap();
        let mid = skeleton.joint("mid").unwrap();
        let tip = skeleton.joint("tip").unwrap();

        assert_eq!(skeleton.topology().root(), root);
        assert_relative_eq!(skeleton.rest_length(mid, tip).unwrap(), 1.0);
        assert_relative_eq!(skeleton.rest_length(mid, root).unwrap(), 1.0);
        assert_eq!(skeleton.parent_length(root), 0.0);
        assert_eq!(skeleton.max_length_error(&skeleton.rest_pose()), 0.0);
    }

    #[test]
    fn test_builder_rejects_second_root() {
        let err = Skeleton::builder()
            .root("a", Vec3::ZERO)
            .root("b", Vec3::X)
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::MultipleRoots(_)));
    }

    #[test]
    fn test_builder_rejects_unknown_parent() {
        let err = Skeleton::builder()
            .root("a", Vec3::ZERO)
            .child("b", Vec3::X, "ghost")
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownJoint { .. }));
    }

    #[test]
    fn test_non_finite_rest_rejected() {
        let err = Skeleton::builder()
            .root("a", Vec3::new(f32::NAN, 0.0, 0.0))
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::NonFiniteRestPosition("a".to_owned()));
    }

    #[test]
    fn test_humanoid_ids_resolve() {
        let skeleton = Skeleton::humanoid().unwrap();
        assert_eq!(skeleton.joint_count(), Humanoid::COUNT);
        for joint in Humanoid::ALL {
            assert_eq!(skeleton.joint(joint.as_str()), Some(joint.id()));
        }
        assert_eq!(skeleton.topology().root(), Humanoid::Pelvis.id());
        assert_eq!(
            skeleton.resolve("tail"),
            Err(SolveError::UnknownJoint("tail".to_owned()))
        );
    }

    #[test]
    fn test_initial_pose_overrides_but_keeps_lengths() {
        let skeleton = Skeleton::humanoid().unwrap();
        let raised = Vec3::new(-0.6, 1.6, 0.0);
        let pose = skeleton
            .initial_pose([(Humanoid::LeftWrist.id(), raised)])
            .unwrap();

        assert_eq!(pose.get(Humanoid::LeftWrist.id()), raised);
        assert_eq!(pose.get(Humanoid::Head.id()), Vec3::new(0.0, 1.6, 0.0));
        assert!(skeleton.max_length_error(&pose) > 0.1);

        let elbow = Humanoid::LeftElbow.id();
        let wrist = Humanoid::LeftWrist.id();
        let rest_len = skeleton.rest_length(elbow, wrist).unwrap();
        assert_relative_eq!(rest_len, Vec3::new(0.1, 0.4, 0.0).length(), epsilon = 1e-6);

        let err = skeleton.initial_pose([(JointId(99), Vec3::ZERO)]).unwrap_err();
        assert_eq!(err, SolveError::JointOutOfRange { id: 99, count: 16 });
    }

    #[test]
    fn test_initial_pose_rejects_non_finite_override() {
        let skeleton = Skeleton::humanoid().unwrap();
        let err = skeleton
            .initial_pose([(Humanoid::Head.id(), Vec3::new(f32::NAN, 0.0, 0.0))])
            .unwrap_err();
        assert_eq!(err, SolveError::NonFinitePosition("head".to_owned()));

        let err = skeleton
            .initial_pose([(Humanoid::LeftAnkle.id(), Vec3::splat(f32::INFINITY))])
            .unwrap_err();
        assert_eq!(err, SolveError::NonFinitePosition("leftAnkle".to_owned()));
    }

    #[test]
    fn test_length_error_reports_nan_joint() {
        let skeleton = Skeleton::humanoid().unwrap();
        let mut positions = skeleton.rest_pose().into_positions();
        positions[Humanoid::Head.id().index()] = Vec3::new(f32::NAN, 0.0, 0.0);
        let broken = Pose::from_positions(positions);

        assert!(skeleton.max_length_error(&broken).is_nan());
        assert_eq!(
            skeleton.check_pose(&broken),
            Err(SolveError::NonFinitePosition("head".to_owned()))
        );
        assert_eq!(skeleton.check_pose(&skeleton.rest_pose()), Ok(()));
    }

    #[test]
    fn test_named_pose_in_joint_order() {
        let skeleton = Skeleton::humanoid().unwrap();
        let named = skeleton.named_pose(&skeleton.rest_pose());
        assert_eq!(named.len(), Humanoid::COUNT);
        assert_eq!(named[0].name, "head");
        assert_eq!(named[9].name, "pelvis");
        assert_eq!(named[9].position, Vec3::ZERO);
    }
}
