//! Camera: view transform, projection and per-pixel rays, in the star's f64 frame.

use glam::{DMat4, DQuat, DVec3};
use orrery_scene::Ray;

/// A camera looking down its local -Z axis.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Position in the star's frame.
    pub position: DVec3,
    /// Rotation as a unit quaternion.
    pub rotation: DQuat,
    /// Projection parameters.
    pub projection: Projection,
    /// Near clip distance (always positive).
    pub near: f64,
    /// Far clip distance (always positive, > near).
    pub far: f64,
}

/// Projection type for the camera.
#[derive(Debug, Clone)]
pub enum Projection {
    /// Perspective projection.
    Perspective {
        /// Vertical field of view in radians.
        fov_y: f64,
        /// Width / height.
        aspect_ratio: f64,
    },
    /// Orthographic projection, for top-down system maps.
    Orthographic {
        /// Half-height of the view volume in world units.
        half_height: f64,
        /// Width / height.
        aspect_ratio: f64,
    },
}

/// A world point mapped to the pixel grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    /// Horizontal pixel coordinate, 0 at the left edge.
    pub x: f64,
    /// Vertical pixel coordinate, 0 at the top edge.
    pub y: f64,
    /// Distance along the pixel's ray; comparable with framebuffer depth.
    pub depth: f64,
    /// Pixels per world unit at that depth.
    pub pixels_per_unit: f64,
}

impl Camera {
    /// A perspective camera at `eye` looking at `target` with +Y up.
    pub fn looking_at(eye: DVec3, target: DVec3, fov_y: f64, aspect_ratio: f64) -> Self {
        let view = DMat4::look_at_rh(eye, target, DVec3::Y);
        let rotation = DQuat::from_mat4(&view.inverse());
        Self {
            position: eye,
            rotation,
            projection: Projection::Perspective {
                fov_y,
                aspect_ratio,
            },
            ..Self::default()
        }
    }

    /// Compute the view matrix (inverse of camera transform).
    pub fn view_matrix(&self) -> DMat4 {
        (DMat4::from_translation(self.position) * DMat4::from_quat(self.rotation)).inverse()
    }

    /// The forward direction vector (-Z in camera space).
    pub fn forward(&self) -> DVec3 {
        self.rotation * DVec3::NEG_Z
    }

    /// The up direction vector (+Y in camera space).
    pub fn up(&self) -> DVec3 {
        self.rotation * DVec3::Y
    }

    /// The right direction vector (+X in camera space).
    pub fn right(&self) -> DVec3 {
        self.rotation * DVec3::X
    }

    /// Width / height of the view.
    pub fn aspect_ratio(&self) -> f64 {
        match self.projection {
            Projection::Perspective { aspect_ratio, .. }
            | Projection::Orthographic { aspect_ratio, .. } => aspect_ratio,
        }
    }

    /// Update the aspect ratio after a viewport resize.
    pub fn set_aspect_ratio(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        let ratio = width as f64 / height as f64;
        match &mut self.projection {
            Projection::Perspective { aspect_ratio, .. }
            | Projection::Orthographic { aspect_ratio, .. } => *aspect_ratio = ratio,
        }
    }

    /// Ray through the centre of pixel `(px, py)` of a `width` x `height` grid.
    pub fn ray_for_pixel(&self, px: u32, py: u32, width: u32, height: u32) -> Ray {
        let ndc_x = ((px as f64 + 0.5) / width as f64) * 2.0 - 1.0;
        let ndc_y = 1.0 - ((py as f64 + 0.5) / height as f64) * 2.0;
        self.ray_through(ndc_x, ndc_y)
    }

    /// Ray through normalized device coordinates in `[-1, 1]`, +Y up.
    pub fn ray_through(&self, ndc_x: f64, ndc_y: f64) -> Ray {
        match self.projection {
            Projection::Perspective {
                fov_y,
                aspect_ratio,
            } => {
                let tan = (fov_y * 0.5).tan();
                let local = DVec3::new(ndc_x * tan * aspect_ratio, ndc_y * tan, -1.0);
                Ray::new(self.position, self.rotation * local)
            }
            Projection::Orthographic {
                half_height,
                aspect_ratio,
            } => {
                let offset = self.right() * (ndc_x * half_height * aspect_ratio)
                    + self.up() * (ndc_y * half_height);
                Ray::new(self.position + offset, self.forward())
            }
        }
    }

    /// Map a world point onto a `width` x `height` pixel grid. `None` when
    /// the point is behind the near plane or beyond the far plane.
    pub fn project(&self, world: DVec3, width: u32, height: u32) -> Option<Projected> {
        let local = self.view_matrix().transform_point3(world);
        let forward_distance = -local.z;
        if forward_distance < self.near || forward_distance > self.far {
            return None;
        }
        let (ndc_x, ndc_y, pixels_per_unit, depth) = match self.projection {
            Projection::Perspective {
                fov_y,
                aspect_ratio,
            } => {
                let tan = (fov_y * 0.5).tan();
                (
                    local.x / (forward_distance * tan * aspect_ratio),
                    local.y / (forward_distance * tan),
                    height as f64 / (2.0 * tan * forward_distance),
                    local.length(),
                )
            }
            Projection::Orthographic {
                half_height,
                aspect_ratio,
            } => (
                local.x / (half_height * aspect_ratio),
                local.y / half_height,
                height as f64 / (2.0 * half_height),
                forward_distance,
            ),
        };
        Some(Projected {
            x: (ndc_x * 0.5 + 0.5) * width as f64,
            y: (0.5 - ndc_y * 0.5) * height as f64,
            depth,
            pixels_per_unit,
        })
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: DVec3::ZERO,
            rotation: DQuat::IDENTITY,
            projection: Projection::Perspective {
                fov_y: std::f64::consts::FRAC_PI_4,
                aspect_ratio: 16.0 / 9.0,
            },
            near: 0.1,
            far: 1.0e6,
        }
    }
}
