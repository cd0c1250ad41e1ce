//! Lume Core - scene inputs and image output for the Lume path tracer.
//!
//! This crate provides:
//!
//! - **OBJ support**: Wavefront OBJ parsing, serialization and triangle extraction
//! - **Mesh types**: `Vertex` and `Mesh` (triangles with optional vertex normals)
//! - **Scene descriptions**: JSON camera/material/object records
//! - **Image output**: PNG writing for finished renders
//!
//! # Example
//!
//! ```ignore
//! use lume_core::obj::ObjModel;
//!
//! let model = ObjModel::load("icosahedron.obj")?;
//! println!("Loaded {} triangles", model.triangle_faces()?.len());
//! ```

pub mod image_io;
pub mod mesh;
pub mod obj;
pub mod scene;

// Re-export commonly used types
pub use image_io::{write_png, ImageWriteError};
pub use mesh::{Mesh, Vertex};
pub use obj::{FaceIndex, ObjError, ObjModel};
pub use scene::{CameraConfig, MaterialDesc, ObjectDesc, SceneDescription, SceneError};
