use glam::Vec3;

use crate::ik::{JointId, Pose};
use crate::render::Camera;

/// Which joint, if any, the pointer is currently dragging.
///
/// At most one joint drags at a time. Camera controls should stay disabled
/// while [`is_dragging`](Self::is_dragging) is true.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DragState {
    joint: Option<JointId>,
}

impl DragState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts dragging `joint`, replacing any drag already in progress.
    pub fn begin(&mut self, joint: JointId) {
        self.joint = Some(joint);
    }

    pub fn end(&mut self) -> Option<JointId> {
        self.joint.take()
    }

    pub fn joint(&self) -> Option<JointId> {
        self.joint
    }

    pub fn is_dragging(&self) -> bool {
        self.joint.is_some()
    }

    pub fn is_dragging_joint(&self, joint: JointId) -> bool {
        self.joint == Some(joint)
    }
}

/// Projects pointer positions onto the drag plane, `z = 0` by default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragController {
    pub camera: Camera,
    pub plane_normal: Vec3,
    pub plane_d: f32,
}

impl Default for DragController {
    fn default() -> Self {
        Self::new(Camera::default())
    }
}

impl DragController {
    pub fn new(camera: Camera) -> Self {
        Self {
            camera,
            plane_normal: Vec3::Z,
            plane_d: 0.0,
        }
    }

    pub fn with_plane(mut self, normal: Vec3, d: f32) -> Self {
        self.plane_normal = normal;
        self.plane_d = d;
        self
    }

    /// World point under the pointer, if the pointer ray meets the plane.
    pub fn pointer_target(&self, ndc_x: f32, ndc_y: f32) -> Option<Vec3> {
        self.camera
            .screen_to_world_on_plane(ndc_x, ndc_y, self.plane_normal, self.plane_d)
    }

    /// Joint whose marker of `radius` is hit first by the pointer ray.
    pub fn pick_joint(&self, pose: &Pose, ndc_x: f32, ndc_y: f32, radius: f32) -> Option<JointId> {
        let ray = self.camera.screen_to_ray(ndc_x, ndc_y);
        pose.iter()
            .filter_map(|(joint, position)| {
                ray.intersect_sphere(position, radius).map(|t| (joint, t))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(joint, _)| joint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_drag_at_a_time() {
        let mut drag = DragState::new();
        assert!(!drag.is_dragging());

        drag.begin(JointId(2));
        drag.begin(JointId(5));
        assert!(drag.is_dragging_joint(JointId(5)));
        assert!(!drag.is_dragging_joint(JointId(2)));

        assert_eq!(drag.end(), Some(JointId(5)));
        assert!(!drag.is_dragging());
        assert_eq!(drag.end(), None);
    }

    #[test]
    fn test_pointer_lands_on_plane() {
        let controller = DragController::default();
        let point = controller.pointer_target(0.2, 0.3).unwrap();
        assert!(point.z.abs() < 1e-4);

        let edge_on = DragController::default().with_plane(Vec3::X, 0.0);
        assert!(edge_on.pointer_target(0.0, 0.0).is_none());
    }

    #[test]
    fn test_pick_nearest_marker() {
        let controller = DragController::default();
        let pose = Pose::from_positions(vec![
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(0.0, 0.0, 0.5),
            Vec3::new(1.0, 0.0, 0.0),
        ]);

        assert_eq!(controller.pick_joint(&pose, 0.0, 0.0, 0.1), Some(JointId(1)));
        assert_eq!(controller.pick_joint(&pose, 0.9, -0.9, 0.1), None);
    }
}
