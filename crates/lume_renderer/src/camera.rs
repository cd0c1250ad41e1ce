//! Camera for ray generation.

use lume_core::CameraConfig;
use lume_math::{unit_vector, Ray, Vec3};
use rand::RngCore;
use thiserror::Error;

use crate::gen_f32;

/// Camera settings that cannot produce a usable view.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CameraError {
    #[error("Image width must be at least 1 pixel")]
    ZeroWidth,

    #[error("Samples per pixel must be at least 1")]
    ZeroSamples,

    #[error("Max depth must be at least 1")]
    ZeroDepth,

    #[error("Aspect ratio must be positive and finite, got {0}")]
    InvalidAspectRatio(f32),

    #[error("Vertical field of view must be in (0, 180) degrees, got {0}")]
    InvalidFov(f32),

    #[error("Damping must be finite and non-negative, got {0}")]
    InvalidDamping(f32),

    #[error("look_from and look_at are the same point ({0})")]
    DegenerateView(Vec3),

    #[error("v_up {v_up} is parallel to the view direction {view}")]
    UpParallelToView { v_up: Vec3, view: Vec3 },
}

/// Camera for generating rays into the scene.
///
/// Holds the state derived from a [`CameraConfig`]: image size, the
/// orthonormal basis, and the pixel grid on the viewport.
#[derive(Debug, Clone)]
pub struct Camera {
    // Image settings
    image_width: u32,
    image_height: u32,
    samples_per_pixel: u32,
    max_depth: u32,
    damping: f32,

    // Derived viewport
    center: Vec3,
    pixel00_loc: Vec3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    samples_scale: f32,
}

impl Camera {
    /// Validate `config` and derive the viewport.
    pub fn new(config: &CameraConfig) -> Result<Self, CameraError> {
        if config.image_width == 0 {
            return Err(CameraError::ZeroWidth);
        }
        if config.samples_per_pixel == 0 {
            return Err(CameraError::ZeroSamples);
        }
        if config.max_depth == 0 {
            return Err(CameraError::ZeroDepth);
        }
        if !(config.aspect_ratio.is_finite() && config.aspect_ratio > 0.0) {
            return Err(CameraError::InvalidAspectRatio(config.aspect_ratio));
        }
        if !(config.vfov > 0.0 && config.vfov < 180.0) {
            return Err(CameraError::InvalidFov(config.vfov));
        }
        let damping = config.damping.unwrap_or(1.0);
        if !(damping.is_finite() && damping >= 0.0) {
            return Err(CameraError::InvalidDamping(damping));
        }

        let image_width = config.image_width;
        let image_height = config.image_height();
        let center = config.look_from;

        // Camera basis vectors
        let view = config.look_from - config.look_at;
        let w = unit_vector(view).ok_or(CameraError::DegenerateView(config.look_from))?;
        let u = unit_vector(config.v_up.cross(w)).ok_or(CameraError::UpParallelToView {
            v_up: config.v_up,
            view: -w,
        })?;
        let v = w.cross(u);

        // Viewport dimensions, placed at the look_at distance
        let focal_length = view.length();
        let h = (config.vfov.to_radians() / 2.0).tan();
        let viewport_height = 2.0 * h * focal_length;
        let viewport_width = viewport_height * (image_width as f32 / image_height as f32);

        // Vectors across the horizontal and down the vertical viewport edges
        let viewport_u = viewport_width * u;
        let viewport_v = -viewport_height * v;

        let pixel_delta_u = viewport_u / image_width as f32;
        let pixel_delta_v = viewport_v / image_height as f32;

        let viewport_upper_left = center - focal_length * w - viewport_u / 2.0 - viewport_v / 2.0;
        let pixel00_loc = viewport_upper_left + 0.5 * (pixel_delta_u + pixel_delta_v);

        log::debug!(
            "Camera {}x{} from {} to {}, viewport {:.3}x{:.3}",
            image_width,
            image_height,
            config.look_from,
            config.look_at,
            viewport_width,
            viewport_height
        );

        Ok(Self {
            image_width,
            image_height,
            samples_per_pixel: config.samples_per_pixel,
            max_depth: config.max_depth,
            damping,
            center,
            pixel00_loc,
            pixel_delta_u,
            pixel_delta_v,
            u,
            v,
            w,
            samples_scale: 1.0 / config.samples_per_pixel as f32,
        })
    }

    /// Generate a ray for pixel (i, j), jittered within the pixel footprint.
    pub fn get_ray(&self, i: u32, j: u32, rng: &mut dyn RngCore) -> Ray {
        let (dx, dy) = sample_square(rng);

        let pixel_sample = self.pixel00_loc
            + ((i as f32) + dx) * self.pixel_delta_u
            + ((j as f32) + dy) * self.pixel_delta_v;

        Ray::new(self.center, pixel_sample - self.center)
    }

    pub fn image_width(&self) -> u32 {
        self.image_width
    }

    pub fn image_height(&self) -> u32 {
        self.image_height
    }

    pub fn samples_per_pixel(&self) -> u32 {
        self.samples_per_pixel
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Per-bounce damping factor (1.0 when unset).
    pub fn damping(&self) -> f32 {
        self.damping
    }

    /// Get the samples scale factor (1 / samples_per_pixel).
    pub fn samples_scale(&self) -> f32 {
        self.samples_scale
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// Orthonormal camera basis `(u, v, w)`; `w` points away from the view.
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        (self.u, self.v, self.w)
    }
}

/// Sample a random offset in [-0.5, 0.5) x [-0.5, 0.5).
fn sample_square(rng: &mut dyn RngCore) -> (f32, f32) {
    (gen_f32(rng) - 0.5, gen_f32(rng) - 0.5)
}
