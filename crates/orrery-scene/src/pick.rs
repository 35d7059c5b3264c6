//! Rays and ray-sphere tests, shared by picking and the geometry pass.

use glam::DVec3;

/// A ray in the star's frame. `direction` is expected to be normalized.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: DVec3,
    pub direction: DVec3,
}

impl Ray {
    /// Build a ray, normalizing the direction.
    pub fn new(origin: DVec3, direction: DVec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at parameter `t` along the ray.
    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }
}

/// Ray-sphere intersection returning `(t_near, t_far)`, or `None` on miss.
/// Either value may be negative when the origin is inside or past the sphere.
pub fn ray_sphere_intersect(ray: &Ray, center: DVec3, radius: f64) -> Option<(f64, f64)> {
    let oc = ray.origin - center;
    let b = oc.dot(ray.direction);
    let c = oc.dot(oc) - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let sqrt_disc = disc.sqrt();
    Some((-b - sqrt_disc, -b + sqrt_disc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_from_outside() {
        let ray = Ray::new(DVec3::new(0.0, 0.0, -10.0), DVec3::Z);
        let (near, far) = ray_sphere_intersect(&ray, DVec3::ZERO, 2.0).unwrap();
        assert!((near - 8.0).abs() < 1e-12);
        assert!((far - 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_miss() {
        let ray = Ray::new(DVec3::new(5.0, 0.0, -10.0), DVec3::Z);
        assert!(ray_sphere_intersect(&ray, DVec3::ZERO, 2.0).is_none());
    }

    #[test]
    fn test_origin_inside_sphere() {
        let ray = Ray::new(DVec3::ZERO, DVec3::X * 3.0);
        let (near, far) = ray_sphere_intersect(&ray, DVec3::ZERO, 1.0).unwrap();
        assert!(near < 0.0);
        assert!((far - 1.0).abs() < 1e-12);
        assert!((ray.at(far) - DVec3::X).length() < 1e-12);
    }
}
