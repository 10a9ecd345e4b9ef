use glam::Vec3;

use super::vector::normalize;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: normalize(direction),
        }
    }

    pub fn between_points(from: Vec3, to: Vec3) -> Self {
        Self::new(from, to - from)
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Intersection with the plane `normal · p + d = 0`, in front of the
    /// origin only.
    pub fn intersect_plane(&self, normal: Vec3, d: f32) -> Option<Vec3> {
        let denom = self.direction.dot(normal);
        if denom.abs() > 0.0001 {
            let t = -(self.origin.dot(normal) + d) / denom;
            if t >= 0.0 {
                return Some(self.at(t));
            }
        }
        None
    }

    /// Nearest non-negative `t` at which the ray enters (or, from inside,
    /// leaves) the sphere.
    pub fn intersect_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        let oc = self.origin - center;
        let a = self.direction.dot(self.direction);
        if a == 0.0 {
            return None;
        }
        let b = 2.0 * oc.dot(self.direction);
        let c = oc.dot(oc) - radius * radius;
        let discriminant = b * b - 4.0 * a * c;

        if discriminant < 0.0 {
            return None;
        }

        let sqrt_d = discriminant.sqrt();
        [(-b - sqrt_d) / (2.0 * a), (-b + sqrt_d) / (2.0 * a)]
            .into_iter()
            .find(|t| *t >= 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_hits_xy_plane() {
        let ray = Ray::new(Vec3::new(0.5, 0.5, 3.0), Vec3::NEG_Z);
        let hit = ray.intersect_plane(Vec3::Z, 0.0).unwrap();
        assert_relative_eq!(hit.x, 0.5);
        assert_relative_eq!(hit.y, 0.5);
        assert_relative_eq!(hit.z, 0.0);
    }

    #[test]
    fn test_parallel_and_behind_miss() {
        let parallel = Ray::new(Vec3::new(0.0, 0.0, 1.0), Vec3::X);
        assert!(parallel.intersect_plane(Vec3::Z, 0.0).is_none());

        let away = Ray::new(Vec3::new(0.0, 0.0, 1.0), Vec3::Z);
        assert!(away.intersect_plane(Vec3::Z, 0.0).is_none());
    }

    #[test]
    fn test_sphere_hit_and_miss() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 3.0), Vec3::NEG_Z);
        let t = ray.intersect_sphere(Vec3::ZERO, 0.5).unwrap();
        assert_relative_eq!(t, 2.5, epsilon = 1e-6);

        assert!(ray.intersect_sphere(Vec3::new(2.0, 0.0, 0.0), 0.5).is_none());
        assert!(ray.intersect_sphere(Vec3::new(0.0, 0.0, 5.0), 0.5).is_none());

        let inside = Ray::new(Vec3::ZERO, Vec3::X);
        assert_relative_eq!(inside.intersect_sphere(Vec3::ZERO, 1.0).unwrap(), 1.0);
    }
}
