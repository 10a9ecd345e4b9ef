use glam::{Mat4, Vec3, Vec4};

use crate::math::Ray;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 3.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov: 60.0_f32.to_radians(),
            aspect: 1.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// Ray through normalized device coordinates (`-1..1` on both axes, +y up).
    pub fn screen_to_ray(&self, ndc_x: f32, ndc_y: f32) -> Ray {
        let inv_view_proj = self.view_projection().inverse();

        let near_point = inv_view_proj * Vec4::new(ndc_x, ndc_y, 0.0, 1.0);
        let far_point = inv_view_proj * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);

        let near = near_point.truncate() / near_point.w;
        let far = far_point.truncate() / far_point.w;

        Ray::between_points(near, far)
    }

    pub fn screen_to_world_on_plane(
        &self,
        ndc_x: f32,
        ndc_y: f32,
        plane_normal: Vec3,
        plane_d: f32,
    ) -> Option<Vec3> {
        self.screen_to_ray(ndc_x, ndc_y)
            .intersect_plane(plane_normal, plane_d)
    }
}
