//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing with configurable depth
//! - Gamma correction
//! - Anti-aliasing via multi-sampling
//! - Parallel bucket rendering with deterministic per-bucket random streams

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use lume_core::{write_png, ImageWriteError};
use lume_math::{Interval, Ray};
use rand::RngCore;
use rayon::prelude::*;
use thiserror::Error;

use crate::bucket::{generate_buckets, render_bucket, DEFAULT_BUCKET_SIZE};
use crate::{Camera, Color, Hittable};

/// Smallest accepted hit distance; keeps bounced rays off their own surface.
const T_MIN: f32 = 0.001;

/// Errors that stop a render.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Render cancelled")]
    Cancelled,

    #[error("Failed to build render thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Base seed for every bucket's random stream
    pub seed: u64,
    /// Bucket edge length in pixels
    pub bucket_size: u32,
    /// Worker threads (None = rayon's global pool)
    pub threads: Option<usize>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            bucket_size: DEFAULT_BUCKET_SIZE,
            threads: None,
        }
    }
}

/// Shared flag used to stop a render between pixels.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask every worker to stop at its next pixel.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Compute the color seen by a ray.
///
/// Each bounce multiplies by the material's attenuation and by `damping`.
/// Recursion stops at `depth == 0` (black) or when a ray escapes to the sky.
pub fn ray_color(
    ray: &Ray,
    world: &Hittable,
    depth: u32,
    damping: f32,
    rng: &mut dyn RngCore,
) -> Color {
    // If we've exceeded max depth, return black (no light)
    if depth == 0 {
        return Color::ZERO;
    }

    let Some(rec) = world.hit(ray, Interval::new(T_MIN, f32::INFINITY)) else {
        return sky_gradient(ray);
    };

    match rec.material.scatter(ray, &rec, rng) {
        Some(result) => {
            let scattered_color = ray_color(&result.scattered, world, depth - 1, damping, rng);
            damping * result.attenuation * scattered_color
        }
        // Ray was absorbed
        None => Color::ZERO,
    }
}

/// Compute sky gradient background.
fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize_or_zero();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a linear color to 8-bit RGB.
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    let intensity = Interval::new(0.0, 0.999);
    let to_byte = |c: f32| (256.0 * intensity.clamp(linear_to_gamma(c))) as u8;
    [to_byte(color.x), to_byte(color.y), to_byte(color.z)]
}

/// Render a single pixel with multi-sampling.
pub fn render_pixel(
    camera: &Camera,
    world: &Hittable,
    x: u32,
    y: u32,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel_color = Color::ZERO;

    for _ in 0..camera.samples_per_pixel() {
        // Camera.get_ray already adds random offset for anti-aliasing
        let ray = camera.get_ray(x, y, rng);
        pixel_color += ray_color(&ray, world, camera.max_depth(), camera.damping(), rng);
    }

    // Average the samples
    pixel_color * camera.samples_scale()
}

/// Linear-color image buffer for storing render output.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let i = self.index(x, y);
        self.pixels[i] = color;
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Gamma-corrected 8-bit pixels, row-major.
    pub fn to_rgb(&self) -> Vec<[u8; 3]> {
        self.pixels.iter().map(|c| color_to_rgb(*c)).collect()
    }

    /// Write the buffer as an image file.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), ImageWriteError> {
        write_png(path, self.width, self.height, &self.to_rgb())
    }
}

/// Render the entire scene to an image buffer.
///
/// Buckets are rendered in parallel, each with its own random stream seeded
/// from `config.seed` and the bucket position, so a given seed always
/// produces the same image whatever the thread count.
pub fn render(
    camera: &Camera,
    world: &Hittable,
    config: &RenderConfig,
    cancel: &CancelToken,
) -> Result<ImageBuffer, RenderError> {
    let width = camera.image_width();
    let height = camera.image_height();
    let buckets = generate_buckets(width, height, config.bucket_size);

    log::info!(
        "Rendering {}x{} @ {} spp, depth {}, {} buckets",
        width,
        height,
        camera.samples_per_pixel(),
        camera.max_depth(),
        buckets.len()
    );
    let start = Instant::now();

    let job = || {
        buckets
            .par_iter()
            .map(|bucket| render_bucket(bucket, camera, world, config.seed, cancel))
            .collect::<Result<Vec<_>, RenderError>>()
    };

    let results = match config.threads {
        Some(threads) => rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()?
            .install(job),
        None => job(),
    };
    let results = match results {
        Ok(results) => results,
        Err(err) => {
            log::warn!("Render stopped after {:?}: {}", start.elapsed(), err);
            return Err(err);
        }
    };

    let mut image = ImageBuffer::new(width, height);
    for result in results {
        let bucket = result.bucket;
        for (i, color) in result.pixels.into_iter().enumerate() {
            let x = bucket.x + i as u32 % bucket.width;
            let y = bucket.y + i as u32 / bucket.width;
            image.set(x, y, color);
        }
    }

    log::info!("Rendered in {:?}", start.elapsed());
    Ok(image)
}
