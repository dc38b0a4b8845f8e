//! Camera, window sizing and orbit controls.
//!
//! No drawing happens here; these types hold the state a renderer reads each frame.

use crate::float_types::{EPSILON, PI, Real};
use crate::material::{CLEAR_COLOR, Color};
use nalgebra::{Isometry3, Matrix4, Perspective3, Point3, Vector3};

/// Highest device pixel ratio the output resolution follows
pub const MAX_PIXEL_RATIO: Real = 2.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sizes {
    pub width: u32,
    pub height: u32,
    /// Device pixel ratio after clamping
    pub pixel_ratio: Real,
}

impl Sizes {
    pub fn new(width: u32, height: u32, device_pixel_ratio: Real) -> Self {
        Sizes {
            width,
            height,
            pixel_ratio: device_pixel_ratio.clamp(EPSILON, MAX_PIXEL_RATIO),
        }
    }

    /// Width over height, or `None` while either side is zero (a minimised window)
    pub fn aspect(&self) -> Option<Real> {
        (self.width > 0 && self.height > 0).then(|| self.width as Real / self.height as Real)
    }

    /// Size of the render target in physical pixels
    pub fn framebuffer(&self) -> (u32, u32) {
        (
            (self.width as Real * self.pixel_ratio).round() as u32,
            (self.height as Real * self.pixel_ratio).round() as u32,
        )
    }
}

#[derive(Clone, Debug)]
pub struct PerspectiveCamera {
    /// Vertical field of view in degrees
    pub fov: Real,
    pub aspect: Real,
    pub near: Real,
    pub far: Real,
    pub position: Point3<Real>,
    pub up: Vector3<Real>,
    projection: Perspective3<Real>,
}

impl PerspectiveCamera {
    pub fn new(fov: Real, aspect: Real, near: Real, far: Real) -> Self {
        PerspectiveCamera {
            fov,
            aspect,
            near,
            far,
            position: Point3::origin(),
            up: Vector3::y(),
            projection: Perspective3::new(aspect, fov.to_radians(), near, far),
        }
    }

    /// Recompute the projection after `fov`, `aspect`, `near` or `far` changed
    pub fn update_projection_matrix(&mut self) {
        self.projection =
            Perspective3::new(self.aspect, self.fov.to_radians(), self.near, self.far);
    }

    pub fn projection_matrix(&self) -> Matrix4<Real> {
        self.projection.to_homogeneous()
    }

    pub fn view_matrix(&self, target: &Point3<Real>) -> Matrix4<Real> {
        Isometry3::look_at_rh(&self.position, target, &self.up).to_homogeneous()
    }
}

/// Orbit / dolly / pan around a target point with optional inertia.
///
/// Input handlers accumulate deltas; [`OrbitControls::update`] applies them once per
/// frame. With damping enabled each frame consumes only `damping_factor` of the pending
/// rotation and pan, so motion eases out over the following frames.
#[derive(Clone, Debug)]
pub struct OrbitControls {
    pub target: Point3<Real>,
    pub enable_damping: bool,
    pub damping_factor: Real,
    pub min_distance: Real,
    pub max_distance: Real,
    // pending azimuth / polar deltas in radians
    theta_delta: Real,
    phi_delta: Real,
    scale: Real,
    pan_offset: Vector3<Real>,
}

impl Default for OrbitControls {
    fn default() -> Self {
        OrbitControls {
            target: Point3::origin(),
            enable_damping: true,
            damping_factor: 0.05,
            min_distance: 0.0,
            max_distance: Real::INFINITY,
            theta_delta: 0.0,
            phi_delta: 0.0,
            scale: 1.0,
            pan_offset: Vector3::zeros(),
        }
    }
}

impl OrbitControls {
    pub fn rotate_left(&mut self, angle: Real) {
        self.theta_delta -= angle;
    }

    pub fn rotate_up(&mut self, angle: Real) {
        self.phi_delta -= angle;
    }

    /// Move toward the target; `factor > 1` zooms in
    pub fn dolly_in(&mut self, factor: Real) {
        if factor > 0.0 {
            self.scale /= factor;
        }
    }

    pub fn dolly_out(&mut self, factor: Real) {
        if factor > 0.0 {
            self.scale *= factor;
        }
    }

    /// Pan by `(dx, dy)` in the camera's screen plane, world units
    pub fn pan(&mut self, dx: Real, dy: Real, camera: &PerspectiveCamera) {
        let forward = (self.target - camera.position).normalize();
        let right = forward.cross(&camera.up);
        if right.norm_squared() < EPSILON {
            return;
        }
        let right = right.normalize();
        let up = right.cross(&forward);
        self.pan_offset += right * -dx + up * dy;
    }

    /// Apply pending input to `camera`. Returns whether the camera moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let offset = camera.position - self.target;
        let radius = offset.norm();
        if radius < EPSILON {
            return false;
        }

        // spherical coordinates about +Y, theta from +Z toward +X
        let mut theta = offset.x.atan2(offset.z);
        let mut phi = (offset.y / radius).clamp(-1.0, 1.0).acos();

        let (theta_step, phi_step, pan_step) = if self.enable_damping {
            (
                self.theta_delta * self.damping_factor,
                self.phi_delta * self.damping_factor,
                self.pan_offset * self.damping_factor,
            )
        } else {
            (self.theta_delta, self.phi_delta, self.pan_offset)
        };

        theta += theta_step;
        phi = (phi + phi_step).clamp(EPSILON, PI - EPSILON);
        let radius = (radius * self.scale).clamp(self.min_distance, self.max_distance);
        self.target += pan_step;

        let (sin_phi, cos_phi) = phi.sin_cos();
        let (sin_theta, cos_theta) = theta.sin_cos();
        let new_offset = Vector3::new(
            radius * sin_phi * sin_theta,
            radius * cos_phi,
            radius * sin_phi * cos_theta,
        );
        let old_position = camera.position;
        camera.position = self.target + new_offset;

        if self.enable_damping {
            self.theta_delta *= 1.0 - self.damping_factor;
            self.phi_delta *= 1.0 - self.damping_factor;
            self.pan_offset *= 1.0 - self.damping_factor;
        } else {
            self.theta_delta = 0.0;
            self.phi_delta = 0.0;
            self.pan_offset = Vector3::zeros();
        }
        self.scale = 1.0;

        (camera.position - old_position).norm_squared() > EPSILON * EPSILON
    }
}

/// Everything a frame needs besides the scene contents
#[derive(Clone, Debug)]
pub struct Viewport {
    pub sizes: Sizes,
    pub camera: PerspectiveCamera,
    pub controls: OrbitControls,
    pub clear_color: Color,
}

impl Viewport {
    pub const FOV: Real = 75.0;
    pub const NEAR: Real = 0.1;
    pub const FAR: Real = 100.0;

    pub fn new(width: u32, height: u32, device_pixel_ratio: Real) -> Self {
        let sizes = Sizes::new(width, height, device_pixel_ratio);
        let aspect = sizes.aspect().unwrap_or(1.0);
        let mut camera = PerspectiveCamera::new(Self::FOV, aspect, Self::NEAR, Self::FAR);
        camera.position = Point3::new(0.5, 0.0, -2.0);
        Viewport {
            sizes,
            camera,
            controls: OrbitControls::default(),
            clear_color: CLEAR_COLOR,
        }
    }

    /// Window resize. A zero-sized window keeps the last projection.
    pub fn resize(&mut self, width: u32, height: u32, device_pixel_ratio: Real) {
        self.sizes = Sizes::new(width, height, device_pixel_ratio);
        if let Some(aspect) = self.sizes.aspect() {
            self.camera.aspect = aspect;
            self.camera.update_projection_matrix();
        }
        tracing::debug!(width, height, pixel_ratio = self.sizes.pixel_ratio, "viewport resized");
    }

    /// Per-frame controls update; returns whether the view changed
    pub fn tick(&mut self) -> bool {
        self.controls.update(&mut self.camera)
    }

    pub fn view_projection(&self) -> Matrix4<Real> {
        self.camera.projection_matrix() * self.camera.view_matrix(&self.controls.target)
    }
}
