use std::sync::Arc;

use glam::Vec3;
use serde_json::Value;

use crate::config::SolverConfig;
use crate::error::{RequestError, SolveError};
use crate::grid::{pose_tool_definition, GridBox, Provider, DEFAULT_TOLERANCE};
use crate::ik::{FabrikSolver, JointId, Pose, Skeleton};
use crate::render::scene::JOINT_RADIUS;

use super::drag::{DragController, DragState};
use super::request::{parse_tool_calls, MoveRequest, PlotArgs};

/// One posing session: a shared skeleton plus the pose it is currently in.
///
/// Moves are applied one at a time through `&mut self`; the pose is only ever
/// replaced wholesale by solver output.
#[derive(Debug, Clone)]
pub struct PoseSession {
    skeleton: Arc<Skeleton>,
    pose: Pose,
    config: SolverConfig,
    drag: DragState,
    grid: Option<GridBox>,
}

impl PoseSession {
    pub fn new(skeleton: Arc<Skeleton>) -> Self {
        let pose = skeleton.rest_pose();
        Self {
            skeleton,
            pose,
            config: SolverConfig::default(),
            drag: DragState::new(),
            grid: None,
        }
    }

    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Snap tool-call targets onto `grid` before solving.
    pub fn with_grid(mut self, grid: GridBox) -> Self {
        self.grid = Some(grid);
        self
    }

    /// Starts from `pose` instead of the rest pose. Poses of another
    /// skeleton or with non-finite joints are rejected.
    pub fn with_pose(mut self, pose: Pose) -> Result<Self, SolveError> {
        self.skeleton.check_pose(&pose)?;
        self.pose = pose;
        Ok(self)
    }

    pub fn skeleton(&self) -> &Arc<Skeleton> {
        &self.skeleton
    }

    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    pub fn config(&self) -> SolverConfig {
        self.config
    }

    pub fn drag(&self) -> &DragState {
        &self.drag
    }

    pub fn grid(&self) -> Option<&GridBox> {
        self.grid.as_ref()
    }

    pub fn move_joint(&mut self, request: &MoveRequest) -> Result<&Pose, RequestError> {
        let joint = self.skeleton.resolve(&request.joint)?;
        self.move_joint_id(joint, request.target)
    }

    pub fn move_joint_id(&mut self, joint: JointId, target: Vec3) -> Result<&Pose, RequestError> {
        let next = FabrikSolver::solve(
            &self.skeleton,
            &self.pose,
            joint,
            target,
            self.config.iterations,
        )?;
        self.pose = next;
        Ok(&self.pose)
    }

    pub fn begin_drag(&mut self, joint: &str) -> Result<JointId, RequestError> {
        let joint = self.skeleton.resolve(joint)?;
        self.drag.begin(joint);
        log::debug!("drag start: {}", self.skeleton.topology().name(joint));
        Ok(joint)
    }

    /// Starts dragging whichever joint marker is under the pointer.
    pub fn begin_drag_at(
        &mut self,
        controller: &DragController,
        ndc_x: f32,
        ndc_y: f32,
    ) -> Option<JointId> {
        let joint = controller.pick_joint(&self.pose, ndc_x, ndc_y, JOINT_RADIUS)?;
        self.drag.begin(joint);
        log::debug!("drag start: {}", self.skeleton.topology().name(joint));
        Some(joint)
    }

    pub fn end_drag(&mut self) -> Option<JointId> {
        self.drag.end()
    }

    /// Moves the dragged joint under the pointer. Returns `None` when nothing
    /// is being dragged or the pointer ray misses the drag plane.
    pub fn drag_to(
        &mut self,
        controller: &DragController,
        ndc_x: f32,
        ndc_y: f32,
    ) -> Result<Option<&Pose>, RequestError> {
        let Some(joint) = self.drag.joint() else {
            return Ok(None);
        };
        let Some(target) = controller.pointer_target(ndc_x, ndc_y) else {
            return Ok(None);
        };
        self.move_joint_id(joint, target).map(Some)
    }

    /// Turns plot arguments into a move request, snapping off-grid targets.
    pub fn request_from_plot(&self, args: &PlotArgs) -> Result<MoveRequest, RequestError> {
        let joint = args.joint.clone().ok_or(RequestError::MissingJoint)?;
        let mut target = args.scene_point();

        if let Some(grid) = &self.grid {
            let suggestion = grid.did_you_mean(target, DEFAULT_TOLERANCE);
            if !suggestion.is_valid() {
                log::warn!("{joint}: off-grid target snapped\n{suggestion}");
                target = suggestion.closest;
            }
        }

        Ok(MoveRequest { joint, target })
    }

    /// The `plot` tool a model must call to drive this session: grid
    /// coordinates plus one of this skeleton's joint names.
    pub fn tool_definition(&self, provider: Provider) -> Value {
        let grid = self.grid.unwrap_or_default();
        pose_tool_definition(provider, &grid, self.skeleton.topology().names())
    }

    /// Applies every tool call in `json` in order and returns the final pose.
    /// Stops at the first failing call, keeping the moves before it.
    pub fn apply_tool_calls(&mut self, json: &str) -> Result<&Pose, RequestError> {
        let calls = parse_tool_calls(json)?;
        for args in &calls {
            let request = self.request_from_plot(args)?;
            self.move_joint(&request)?;
        }
        Ok(&self.pose)
    }

    pub fn reset(&mut self) {
        self.pose = self.skeleton.rest_pose();
        self.drag.end();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ik::Humanoid;

    fn session() -> PoseSession {
        PoseSession::new(Arc::new(Skeleton::humanoid().unwrap()))
    }

    #[test]
    fn test_move_joint_replaces_pose() {
        let mut session = session();
        let target = Vec3::new(-0.8, 0.9, 0.0);
        let pose = session
            .move_joint(&MoveRequest::new("leftWrist", target))
            .unwrap()
            .clone();

        assert!(pose.get(Humanoid::LeftWrist.id()).distance(target) < 1e-3);
        assert!(session.skeleton().max_length_error(&pose) < 1e-5);
    }

    #[test]
    fn test_unknown_joint_keeps_pose() {
        let mut session = session();
        let before = session.pose().clone();
        let err = session
            .move_joint(&MoveRequest::new("tail", Vec3::ZERO))
            .unwrap_err();
        assert!(matches!(err, RequestError::Solve(SolveError::UnknownJoint(_))));
        assert_eq!(session.pose(), &before);
    }

    #[test]
    fn test_drag_flow() {
        let mut session = session();
        let controller = DragController::default();

        assert!(session.drag_to(&controller, 0.1, 0.1).unwrap().is_none());

        session.begin_drag("head").unwrap();
        assert!(session.drag().is_dragging());
        let head = session.drag_to(&controller, 0.1, 0.4).unwrap().unwrap().get(Humanoid::Head.id());
        assert!(head.z.abs() < 1e-3);

        assert_eq!(session.end_drag(), Some(Humanoid::Head.id()));
        assert!(!session.drag().is_dragging());
    }

    #[test]
    fn test_drag_starts_on_clicked_joint() {
        let mut session = session();
        let controller = DragController::default();

        // The default camera looks down -Z at the origin, where the pelvis sits.
        assert_eq!(
            session.begin_drag_at(&controller, 0.0, 0.0),
            Some(Humanoid::Pelvis.id())
        );
        assert!(session.drag().is_dragging_joint(Humanoid::Pelvis.id()));

        session.end_drag();
        assert_eq!(session.begin_drag_at(&controller, 0.95, -0.95), None);
        assert!(!session.drag().is_dragging());
    }

    #[test]
    fn test_tool_calls_snap_to_grid() {
        let mut session = session().with_grid(GridBox::default());
        let json = r#"[{ "input": { "x": -0.7, "y": 1.0, "z": 0.0, "joint": "rightWrist" } }]"#;

        let pose = session.apply_tool_calls(json).unwrap();
        let wrist = pose.get(Humanoid::RightWrist.id());
        assert!(wrist.distance(Vec3::new(0.75, 1.0, 0.0)) < 1e-3);
    }

    #[test]
    fn test_calls_following_the_advertised_tool_apply() {
        let mut session = session().with_grid(GridBox::default());
        let definition = session.tool_definition(Provider::Claude);
        let schema = &definition["input_schema"];

        let input = serde_json::json!({ "x": -0.75, "y": 1.0, "z": 0.0, "joint": "rightWrist" });
        for key in schema["required"].as_array().unwrap() {
            assert!(input.get(key.as_str().unwrap()).is_some(), "missing {key}");
        }
        for key in input.as_object().unwrap().keys() {
            assert!(schema["properties"].get(key).is_some(), "undeclared {key}");
        }
        assert!(schema["properties"]["joint"]["enum"]
            .as_array()
            .unwrap()
            .contains(&serde_json::json!("rightWrist")));

        let calls = serde_json::json!([{ "input": input }]).to_string();
        let wrist = session.apply_tool_calls(&calls).unwrap().get(Humanoid::RightWrist.id());
        assert!(wrist.distance(Vec3::new(0.75, 1.0, 0.0)) < 1e-3);

        let openai = session.tool_definition(Provider::OpenAi);
        assert_eq!(openai["parameters"]["required"][3], "joint");
        let calls = serde_json::json!([{ "arguments": input.to_string() }]).to_string();
        assert!(session.apply_tool_calls(&calls).is_ok());
    }

    #[test]
    fn test_rejects_non_finite_start_pose() {
        let skeleton = Arc::new(Skeleton::humanoid().unwrap());
        let mut positions = skeleton.rest_pose().into_positions();
        positions[Humanoid::Neck.id().index()] = Vec3::new(0.0, f32::INFINITY, 0.0);

        let err = PoseSession::new(skeleton)
            .with_pose(Pose::from_positions(positions))
            .unwrap_err();
        assert_eq!(err, SolveError::NonFinitePosition("neck".to_owned()));
    }

    #[test]
    fn test_tool_call_without_joint() {
        let mut session = session();
        let json = r#"[{ "arguments": "{\"x\": 0, \"y\": 0, \"z\": 0}" }]"#;
        assert!(matches!(
            session.apply_tool_calls(json),
            Err(RequestError::MissingJoint)
        ));
    }

    #[test]
    fn test_reset_restores_rest_pose() {
        let mut session = session();
        session
            .move_joint(&MoveRequest::new("pelvis", Vec3::new(1.0, 0.0, 0.0)))
            .unwrap();
        session.begin_drag("neck").unwrap();

        session.reset();
        assert_eq!(session.pose(), &session.skeleton().rest_pose());
        assert!(!session.drag().is_dragging());
    }
}
