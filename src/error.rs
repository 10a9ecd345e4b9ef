use thiserror::Error;

/// Skeleton configuration errors.
///
/// Raised while building a [`Skeleton`](crate::ik::Skeleton); a skeleton that
/// fails to build is never handed to the solver.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("skeleton has no joints")]
    Empty,

    #[error("skeleton has {0} joints, at most 65535 are supported")]
    TooManyJoints(usize),

    #[error("joint name must not be empty")]
    EmptyJointName,

    #[error("duplicate joint: {0}")]
    DuplicateJoint(String),

    #[error("unknown joint referenced by {context}: {name}")]
    UnknownJoint { name: String, context: &'static str },

    #[error("bone connects {0} to itself")]
    SelfBone(String),

    #[error("duplicate bone: {a}-{b}")]
    DuplicateBone { a: String, b: String },

    #[error("no hierarchy entry for joint: {0}")]
    MissingHierarchyEntry(String),

    #[error("hierarchy entry listed twice for joint: {0}")]
    DuplicateHierarchyEntry(String),

    #[error("hierarchy disagrees: {child} is listed under {listed} but its parent is {actual:?}")]
    InconsistentHierarchy {
        child: String,
        listed: String,
        actual: Option<String>,
    },

    #[error("hierarchy has no root joint")]
    NoRoot,

    #[error("hierarchy has more than one root: {0:?}")]
    MultipleRoots(Vec<String>),

    #[error("joints not reachable from root {root}: {joints:?}")]
    Unreachable { root: String, joints: Vec<String> },

    #[error("hierarchy edge {parent}-{child} has no bone")]
    MissingBone { parent: String, child: String },

    #[error("no rest length recorded for {parent}-{child}")]
    MissingBoneLength { parent: String, child: String },

    #[error("not a bone: {a}-{b}")]
    UnknownBone { a: String, b: String },

    #[error("rest position of {0} is not finite")]
    NonFiniteRestPosition(String),

    #[error("solver iterations must be at least 1")]
    ZeroIterations,

    #[error("could not read skeleton definition: {0}")]
    Io(String),

    #[error("could not parse skeleton definition: {0}")]
    Parse(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Errors returned by a single solve call. The skeleton and pose are left
/// untouched; callers retry with corrected input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    #[error("unknown joint: {0}")]
    UnknownJoint(String),

    #[error("joint id {id} out of range for a skeleton with {count} joints")]
    JointOutOfRange { id: usize, count: usize },

    #[error("pose has {got} joints, skeleton has {expected}")]
    PoseMismatch { expected: usize, got: usize },

    #[error("solver iterations must be at least 1")]
    ZeroIterations,

    #[error("target position is not finite: {0:?}")]
    NonFiniteTarget([f32; 3]),

    #[error("position of {0} is not finite")]
    NonFinitePosition(String),
}

/// Errors surfaced by the interaction layer.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error(transparent)]
    Solve(#[from] SolveError),

    #[error("malformed tool call: {0}")]
    ToolCall(#[from] serde_json::Error),

    #[error("tool call does not name a joint")]
    MissingJoint,
}
