//! Bucket-based tile rendering.
//!
//! Divides the image into tiles (buckets) that can be rendered
//! independently and in parallel using rayon.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::renderer::{render_pixel, CancelToken, RenderError};
use crate::{Camera, Color, Hittable};

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// X coordinate of bucket's top-left corner
    pub x: u32,
    /// Y coordinate of bucket's top-left corner
    pub y: u32,
    /// Width of the bucket in pixels
    pub width: u32,
    /// Height of the bucket in pixels
    pub height: u32,
}

impl Bucket {
    /// Create a new bucket.
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Get the total number of pixels in this bucket.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }

    /// Seed for this bucket's random stream.
    ///
    /// Depends only on the base seed and the bucket's position, never on
    /// the order buckets are scheduled in.
    pub fn seed(&self, base: u64) -> u64 {
        let position = (u64::from(self.y) << 32) | u64::from(self.x);
        base.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ position
    }
}

/// Default bucket size in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 32;

/// Generate buckets covering an image in row-major order.
///
/// Buckets on the right and bottom edges shrink to fit the image. A zero
/// `bucket_size` is treated as one.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let bucket_size = bucket_size.max(1);
    let mut buckets = Vec::new();

    for y in (0..height).step_by(bucket_size as usize) {
        for x in (0..width).step_by(bucket_size as usize) {
            let bw = bucket_size.min(width - x);
            let bh = bucket_size.min(height - y);
            buckets.push(Bucket::new(x, y, bw, bh));
        }
    }

    buckets
}

/// Render a single bucket.
///
/// Pixels come back in row-major order within the bucket. The cancel
/// token is checked before every pixel.
pub fn render_bucket(
    bucket: &Bucket,
    camera: &Camera,
    world: &Hittable,
    seed: u64,
    cancel: &CancelToken,
) -> Result<BucketResult, RenderError> {
    let mut rng = StdRng::seed_from_u64(bucket.seed(seed));
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

    for local_y in 0..bucket.height {
        for local_x in 0..bucket.width {
            if cancel.is_cancelled() {
                return Err(RenderError::Cancelled);
            }
            let color = render_pixel(camera, world, bucket.x + local_x, bucket.y + local_y, &mut rng);
            pixels.push(color);
        }
    }

    log::debug!(
        "Bucket {}x{} at ({}, {}) done",
        bucket.width,
        bucket.height,
        bucket.x,
        bucket.y
    );

    Ok(BucketResult::new(*bucket, pixels))
}

/// Result of rendering a bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    /// The bucket that was rendered
    pub bucket: Bucket,
    /// Pixel colors in row-major order
    pub pixels: Vec<Color>,
}

impl BucketResult {
    /// Create a new bucket result.
    pub fn new(bucket: Bucket, pixels: Vec<Color>) -> Self {
        Self { bucket, pixels }
    }
}
