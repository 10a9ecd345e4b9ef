use std::collections::{HashMap, HashSet};

use super::definition::HierarchySpec;
use super::joint::{Bone, JointId};
use crate::error::ConfigError;

/// Fixed joint list, bone list and rooted hierarchy of one skeleton.
///
/// The hierarchy is always a single tree whose edges are all bones; any
/// [`Topology`] value that exists has passed that validation.
#[derive(Debug, Clone)]
pub struct Topology {
    names: Vec<String>,
    index: HashMap<String, JointId>,
    bones: Vec<Bone>,
    parents: Vec<Option<JointId>>,
    children: Vec<Vec<JointId>>,
    root: JointId,
}

impl Topology {
    /// Validates and assembles a topology. `names` fixes the joint order.
    pub fn new(
        names: Vec<String>,
        bones: &[(String, String)],
        hierarchy: &[HierarchySpec],
    ) -> Result<Self, ConfigError> {
        if names.is_empty() {
            return Err(ConfigError::Empty);
        }
        if names.len() > u16::MAX as usize {
            return Err(ConfigError::TooManyJoints(names.len()));
        }

        let mut index = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            if name.is_empty() {
                return Err(ConfigError::EmptyJointName);
            }
            if index.insert(name.clone(), JointId::from_index(i)).is_some() {
                return Err(ConfigError::DuplicateJoint(name.clone()));
            }
        }

        let resolve = |name: &str, context: &'static str| {
            index
                .get(name)
                .copied()
                .ok_or_else(|| ConfigError::UnknownJoint {
                    name: name.to_owned(),
                    context,
                })
        };

        let mut bone_list = Vec::with_capacity(bones.len());
        let mut bone_keys = HashSet::with_capacity(bones.len());
        for (a, b) in bones {
            let bone = Bone::new(resolve(a, "bone")?, resolve(b, "bone")?);
            if bone.a == bone.b {
                return Err(ConfigError::SelfBone(a.clone()));
            }
            if !bone_keys.insert(bone.key()) {
                return Err(ConfigError::DuplicateBone {
                    a: a.clone(),
                    b: b.clone(),
                });
            }
            bone_list.push(bone);
        }

        let n = names.len();
        let mut parents: Vec<Option<Option<JointId>>> = vec![None; n];
        let mut listed_children: Vec<Vec<JointId>> = vec![Vec::new(); n];
        for entry in hierarchy {
            let joint = resolve(&entry.joint, "hierarchy")?;
            if parents[joint.index()].is_some() {
                return Err(ConfigError::DuplicateHierarchyEntry(entry.joint.clone()));
            }
            let parent = entry
                .parent
                .as_deref()
                .map(|p| resolve(p, "hierarchy parent"))
                .transpose()?;
            parents[joint.index()] = Some(parent);
            listed_children[joint.index()] = entry
                .children
                .iter()
                .map(|c| resolve(c, "hierarchy children"))
                .collect::<Result<_, _>>()?;
        }

        let parents: Vec<Option<JointId>> = parents
            .into_iter()
            .enumerate()
            .map(|(i, p)| p.ok_or_else(|| ConfigError::MissingHierarchyEntry(names[i].clone())))
            .collect::<Result<_, _>>()?;

        // Children lists and parent links must describe the same edges.
        for (i, kids) in listed_children.iter().enumerate() {
            let listed = JointId::from_index(i);
            for &child in kids {
                if parents[child.index()] != Some(listed) {
                    return Err(ConfigError::InconsistentHierarchy {
                        child: names[child.index()].clone(),
                        listed: names[i].clone(),
                        actual: parents[child.index()].map(|p| names[p.index()].clone()),
                    });
                }
            }
        }
        for (i, parent) in parents.iter().enumerate() {
            if let Some(parent) = parent {
                let child = JointId::from_index(i);
                let count = listed_children[parent.index()]
                    .iter()
                    .filter(|&&c| c == child)
                    .count();
                if count != 1 {
                    return Err(ConfigError::InconsistentHierarchy {
                        child: names[i].clone(),
                        listed: names[parent.index()].clone(),
                        actual: Some(names[parent.index()].clone()),
                    });
                }
            }
        }

        let roots: Vec<JointId> = (0..n)
            .filter(|&i| parents[i].is_none())
            .map(JointId::from_index)
            .collect();
        let root = match roots.as_slice() {
            [] => return Err(ConfigError::NoRoot),
            [root] => *root,
            many => {
                return Err(ConfigError::MultipleRoots(
                    many.iter().map(|r| names[r.index()].clone()).collect(),
                ))
            }
        };

        let mut reached = vec![false; n];
        let mut stack = vec![root];
        while let Some(joint) = stack.pop() {
            if std::mem::replace(&mut reached[joint.index()], true) {
                continue;
            }
            stack.extend(listed_children[joint.index()].iter().copied());
        }
        let unreachable: Vec<String> = (0..n)
            .filter(|&i| !reached[i])
            .map(|i| names[i].clone())
            .collect();
        if !unreachable.is_empty() {
            return Err(ConfigError::Unreachable {
                root: names[root.index()].clone(),
                joints: unreachable,
            });
        }

        for (i, parent) in parents.iter().enumerate() {
            if let Some(parent) = *parent {
                let child = JointId::from_index(i);
                if !bone_keys.contains(&Bone::new(parent, child).key()) {
                    return Err(ConfigError::MissingBone {
                        parent: names[parent.index()].clone(),
                        child: names[i].clone(),
                    });
                }
            }
        }

        log::debug!(
            "topology: {} joints, {} bones, root {}",
            n,
            bone_list.len(),
            names[root.index()]
        );

        Ok(Self {
            names,
            index,
            bones: bone_list,
            parents,
            children: listed_children,
            root,
        })
    }

    pub fn joint_count(&self) -> usize {
        self.names.len()
    }

    pub fn joint(&self, name: &str) -> Option<JointId> {
        self.index.get(name).copied()
    }

    pub fn contains(&self, joint: JointId) -> bool {
        joint.index() < self.names.len()
    }

    /// # Panics
    ///
    /// Panics if `joint` was not issued by this topology.
    pub fn name(&self, joint: JointId) -> &str {
        &self.names[joint.index()]
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn joints(&self) -> impl Iterator<Item = JointId> + '_ {
        (0..self.names.len()).map(JointId::from_index)
    }

    pub fn root(&self) -> JointId {
        self.root
    }

    pub fn parent(&self, joint: JointId) -> Option<JointId> {
        self.parents.get(joint.index()).copied().flatten()
    }

    pub fn children(&self, joint: JointId) -> &[JointId] {
        self.children
            .get(joint.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    pub fn is_bone(&self, a: JointId, b: JointId) -> bool {
        self.bones.iter().any(|bone| bone.connects(a, b))
    }

    /// Parent chain of `joint`, nearest first, ending at the root.
    pub fn ancestors(&self, joint: JointId) -> Ancestors<'_> {
        Ancestors {
            topology: self,
            current: self.parent(joint),
        }
    }

    /// Pre-order walk from the root, children in hierarchy order.
    pub fn depth_first(&self) -> Vec<JointId> {
        let mut order = Vec::with_capacity(self.names.len());
        let mut stack = vec![self.root];
        while let Some(joint) = stack.pop() {
            order.push(joint);
            stack.extend(self.children(joint).iter().rev().copied());
        }
        order
    }
}

pub struct Ancestors<'a> {
    topology: &'a Topology,
    current: Option<JointId>,
}

impl Iterator for Ancestors<'_> {
    type Item = JointId;

    fn next(&mut self) -> Option<JointId> {
        let joint = self.current?;
        self.current = self.topology.parent(joint);
        Some(joint)
    }
}
