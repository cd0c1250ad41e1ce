//! Scene description types.
//!
//! A scene description is a plain JSON record: one camera, a table of named
//! materials, and a list of objects that refer to those materials by name.
//! It carries no behavior; the renderer turns it into hittables.
//!
//! ```json
//! {
//!   "camera": { "image_width": 400, "look_from": [1, 0, 2], "look_at": [1, 0, 0] },
//!   "materials": {
//!     "ground": { "type": "lambertian", "albedo": [0.8, 0.8, 0.0] },
//!     "glass": { "type": "dielectric", "refractive_index": 1.5 }
//!   },
//!   "objects": [
//!     { "type": "sphere", "center": [0, -101, -1], "radius": 100, "material": "ground" },
//!     { "type": "mesh", "path": "icosahedron.obj", "material": "glass" }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use lume_math::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading a scene description.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("IO error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid scene description: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for scene loading.
pub type SceneResult<T> = Result<T, SceneError>;

/// Camera and image settings.
///
/// Only the user-facing knobs live here; the viewport basis and pixel
/// deltas are derived from them when a render starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Ratio of image width over height
    pub aspect_ratio: f32,
    /// Rendered image width in pixels
    pub image_width: u32,
    /// Random samples taken for each pixel
    pub samples_per_pixel: u32,
    /// Maximum number of ray bounces
    pub max_depth: u32,
    /// Vertical field of view in degrees
    pub vfov: f32,
    /// Where the camera is looking from
    pub look_from: Vec3,
    /// Where the camera is looking at
    pub look_at: Vec3,
    /// Camera-relative up direction
    pub v_up: Vec3,
    /// Extra light loss applied at every bounce (1.0 = none)
    pub damping: Option<f32>,
    /// Where the finished image is written
    pub output: PathBuf,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            aspect_ratio: 16.0 / 9.0,
            image_width: 400,
            samples_per_pixel: 10,
            max_depth: 10,
            vfov: 90.0,
            look_from: Vec3::new(0.0, 0.0, -1.0),
            look_at: Vec3::ZERO,
            v_up: Vec3::Y,
            damping: None,
            output: PathBuf::from("output.png"),
        }
    }
}

impl CameraConfig {
    /// Set image width and aspect ratio.
    pub fn with_resolution(mut self, image_width: u32, aspect_ratio: f32) -> Self {
        self.image_width = image_width;
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Set quality settings.
    pub fn with_quality(mut self, samples_per_pixel: u32, max_depth: u32) -> Self {
        self.samples_per_pixel = samples_per_pixel;
        self.max_depth = max_depth;
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, v_up: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.v_up = v_up;
        self
    }

    /// Set vertical field of view in degrees.
    pub fn with_fov(mut self, vfov: f32) -> Self {
        self.vfov = vfov;
        self
    }

    /// Set the per-bounce damping factor.
    pub fn with_damping(mut self, damping: f32) -> Self {
        self.damping = Some(damping);
        self
    }

    /// Set the output image path.
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    /// Image height derived from width and aspect ratio, never below 1.
    pub fn image_height(&self) -> u32 {
        ((self.image_width as f32 / self.aspect_ratio) as u32).max(1)
    }
}

/// A named material entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MaterialDesc {
    Lambertian { albedo: Vec3 },
    Metal { albedo: Vec3, fuzz: f32 },
    Dielectric { refractive_index: f32 },
}

/// An object entry. `material` names a key of [`SceneDescription::materials`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectDesc {
    Sphere {
        center: Vec3,
        radius: f32,
        material: String,
    },
    Triangle {
        vertices: [Vec3; 3],
        #[serde(default)]
        normals: Option<[Vec3; 3]>,
        material: String,
    },
    Mesh {
        path: PathBuf,
        material: String,
        #[serde(default)]
        smooth: bool,
    },
}

impl ObjectDesc {
    /// Name of the material this object uses.
    pub fn material(&self) -> &str {
        match self {
            ObjectDesc::Sphere { material, .. }
            | ObjectDesc::Triangle { material, .. }
            | ObjectDesc::Mesh { material, .. } => material,
        }
    }
}

/// A complete scene: camera, materials and objects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub materials: BTreeMap<String, MaterialDesc>,
    #[serde(default)]
    pub objects: Vec<ObjectDesc>,
    /// Seed for the render's random streams
    #[serde(default)]
    pub seed: u64,
}

impl SceneDescription {
    /// Parse a scene description from JSON text.
    pub fn from_json(content: &str) -> SceneResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load a scene description from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> SceneResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let scene = Self::from_json(&content)?;

        log::info!(
            "Loaded scene {}: {} materials, {} objects",
            path.display(),
            scene.materials.len(),
            scene.objects.len()
        );

        Ok(scene)
    }

    /// Serialize back to pretty-printed JSON.
    pub fn to_json(&self) -> SceneResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
