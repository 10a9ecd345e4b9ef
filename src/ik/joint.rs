use std::fmt;

/// Dense index of a joint within one skeleton's fixed joint list.
///
/// Ids are only meaningful for the skeleton that issued them; resolve names
/// through [`Topology::joint`](super::Topology::joint).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JointId(pub(crate) u16);

impl JointId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub(crate) fn from_index(index: usize) -> Self {
        debug_assert!(index <= u16::MAX as usize);
        Self(index as u16)
    }
}

impl fmt::Display for JointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Rigid, unordered segment between two distinct joints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bone {
    pub a: JointId,
    pub b: JointId,
}

impl Bone {
    pub fn new(a: JointId, b: JointId) -> Self {
        Self { a, b }
    }

    /// Order-independent key, smaller id first.
    pub fn key(self) -> (JointId, JointId) {
        if self.a <= self.b {
            (self.a, self.b)
        } else {
            (self.b, self.a)
        }
    }

    pub fn connects(self, x: JointId, y: JointId) -> bool {
        self.key() == Bone::new(x, y).key()
    }
}

/// Joints of the default humanoid rig, in the order the rig declares them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Humanoid {
    Head = 0,
    Neck = 1,
    LeftShoulder = 2,
    RightShoulder = 3,
    LeftElbow = 4,
    RightElbow = 5,
    LeftWrist = 6,
    RightWrist = 7,
    Spine = 8,
    Pelvis = 9,
    LeftHip = 10,
    RightHip = 11,
    LeftKnee = 12,
    RightKnee = 13,
    LeftAnkle = 14,
    RightAnkle = 15,
}

impl Humanoid {
    pub const COUNT: usize = 16;

    pub const ALL: [Humanoid; Self::COUNT] = [
        Humanoid::Head,
        Humanoid::Neck,
        Humanoid::LeftShoulder,
        Humanoid::RightShoulder,
        Humanoid::LeftElbow,
        Humanoid::RightElbow,
        Humanoid::LeftWrist,
        Humanoid::RightWrist,
        Humanoid::Spine,
        Humanoid::Pelvis,
        Humanoid::LeftHip,
        Humanoid::RightHip,
        Humanoid::LeftKnee,
        Humanoid::RightKnee,
        Humanoid::LeftAnkle,
        Humanoid::RightAnkle,
    ];

    /// Id of this joint in a skeleton built by
    /// [`Skeleton::humanoid`](super::Skeleton::humanoid).
    #[inline]
    pub const fn id(self) -> JointId {
        JointId(self as u16)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Humanoid::Head => "head",
            Humanoid::Neck => "neck",
            Humanoid::LeftShoulder => "leftShoulder",
            Humanoid::RightShoulder => "rightShoulder",
            Humanoid::LeftElbow => "leftElbow",
            Humanoid::RightElbow => "rightElbow",
            Humanoid::LeftWrist => "leftWrist",
            Humanoid::RightWrist => "rightWrist",
            Humanoid::Spine => "spine",
            Humanoid::Pelvis => "pelvis",
            Humanoid::LeftHip => "leftHip",
            Humanoid::RightHip => "rightHip",
            Humanoid::LeftKnee => "leftKnee",
            Humanoid::RightKnee => "rightKnee",
            Humanoid::LeftAnkle => "leftAnkle",
            Humanoid::RightAnkle => "rightAnkle",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|j| j.as_str() == name)
    }
}

impl fmt::Display for Humanoid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
