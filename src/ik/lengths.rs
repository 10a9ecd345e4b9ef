use std::collections::HashMap;

use glam::Vec3;

use super::joint::{Bone, JointId};
use super::topology::Topology;
use crate::error::ConfigError;
use crate::math::distance;

/// Rest length of every bone, measured once from the reference pose.
///
/// Keys are order-independent, so `lookup(a, b) == lookup(b, a)`.
#[derive(Debug, Clone)]
pub struct BoneLengthTable {
    lengths: HashMap<(JointId, JointId), f32>,
}

impl BoneLengthTable {
    /// `rest` is indexed by joint id and must cover every joint of `topology`.
    pub fn from_rest_pose(topology: &Topology, rest: &[Vec3]) -> Self {
        let lengths = topology
            .bones()
            .iter()
            .map(|bone| (bone.key(), distance(rest[bone.a.index()], rest[bone.b.index()])))
            .collect();
        Self { lengths }
    }

    pub fn get(&self, a: JointId, b: JointId) -> Option<f32> {
        self.lengths.get(&Bone::new(a, b).key()).copied()
    }

    pub fn lookup(&self, topology: &Topology, a: JointId, b: JointId) -> Result<f32, ConfigError> {
        self.get(a, b).ok_or_else(|| ConfigError::UnknownBone {
            a: joint_label(topology, a),
            b: joint_label(topology, b),
        })
    }

    pub fn len(&self) -> usize {
        self.lengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }

    pub fn total_length(&self) -> f32 {
        self.lengths.values().sum()
    }
}

fn joint_label(topology: &Topology, joint: JointId) -> String {
    if topology.contains(joint) {
        topology.name(joint).to_owned()
    } else {
        joint.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ik::definition::SkeletonDefinition;
    use approx::assert_relative_eq;

    fn humanoid() -> (Topology, Vec<Vec3>) {
        let def = SkeletonDefinition::humanoid();
        let names = def.rest_pose.iter().map(|j| j.name.clone()).collect();
        let rest = def.rest_pose.iter().map(|j| j.position).collect();
        (Topology::new(names, &def.bones, &def.hierarchy).unwrap(), rest)
    }

    #[test]
    fn test_lengths_are_symmetric() {
        let (topo, rest) = humanoid();
        let table = BoneLengthTable::from_rest_pose(&topo, &rest);
        assert_eq!(table.len(), topo.bones().len());

        for bone in topo.bones() {
            let ab = table.lookup(&topo, bone.a, bone.b).unwrap();
            let ba = table.lookup(&topo, bone.b, bone.a).unwrap();
            assert_eq!(ab, ba);
        }
    }

    #[test]
    fn test_lengths_match_rest_distances() {
        let (topo, rest) = humanoid();
        let table = BoneLengthTable::from_rest_pose(&topo, &rest);

        let head = topo.joint("head").unwrap();
        let neck = topo.joint("neck").unwrap();
        assert_relative_eq!(table.get(head, neck).unwrap(), 0.2, epsilon = 1e-6);

        let knee = topo.joint("leftKnee").unwrap();
        let ankle = topo.joint("leftAnkle").unwrap();
        assert_relative_eq!(table.get(knee, ankle).unwrap(), 0.6, epsilon = 1e-6);
    }

    #[test]
    fn test_lookup_non_bone_is_config_error() {
        let (topo, rest) = humanoid();
        let table = BoneLengthTable::from_rest_pose(&topo, &rest);

        let head = topo.joint("head").unwrap();
        let pelvis = topo.joint("pelvis").unwrap();
        assert_eq!(
            table.lookup(&topo, head, pelvis),
            Err(ConfigError::UnknownBone {
                a: "head".to_owned(),
                b: "pelvis".to_owned()
            })
        );
    }
}
