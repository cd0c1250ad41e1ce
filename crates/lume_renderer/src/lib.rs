//! Lume Renderer - CPU Path Tracing
//!
//! A Monte Carlo path tracer over spheres, triangles and triangle meshes
//! with diffuse, metallic and dielectric materials.

mod bucket;
mod camera;
mod hittable;
mod material;
mod renderer;
mod sphere;
mod triangle;
mod world;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use camera::{Camera, CameraError};
pub use hittable::{HitRecord, Hittable, Scene};
pub use material::{Color, Dielectric, Lambertian, Material, Metal, ScatterResult};
pub use renderer::{
    color_to_rgb, linear_to_gamma, ray_color, render, render_pixel, CancelToken, ImageBuffer,
    RenderConfig, RenderError,
};
pub use sphere::Sphere;
pub use triangle::Triangle;
pub use world::{build_world, BuildError};

/// Re-export math and scene input types
pub use lume_core::{CameraConfig, SceneDescription, Vertex};
pub use lume_math::{Interval, Ray, Vec3};

use rand::{Rng, RngCore};

/// Uniform sample in [0, 1).
#[inline]
pub(crate) fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}
