//! Wavefront OBJ loading and serialization.
//!
//! Geometry is read with `tobj`, triangulated on load (polygons become a fan
//! around their first corner). Each `tobj` model is renumbered to the
//! attributes its faces actually use, so [`ObjModel`] holds only referenced
//! positions, normals and texture coordinates, in order of first use.
//!
//! `mtllib`, `usemtl` and `g` names are collected alongside. Serialization
//! writes every value with four decimals, so serializing a loaded model,
//! parsing that text and serializing again gives back the same text.

use std::fmt;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use lume_math::{Vec2, Vec3};
use thiserror::Error;

use crate::mesh::Vertex;

/// Errors that can occur while reading OBJ data.
#[derive(Error, Debug)]
pub enum ObjError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not an .obj file: {}", .0.display())]
    WrongExtension(PathBuf),

    #[error("Malformed OBJ data: {0}")]
    Load(#[from] tobj::LoadError),

    #[error("Face {face} references {kind} {index}, but only {count} are defined")]
    IndexOutOfRange {
        face: usize,
        kind: &'static str,
        index: u32,
        count: usize,
    },
}

/// Result type for OBJ operations.
pub type ObjResult<T> = Result<T, ObjError>;

/// One corner of a face: 1-based vertex/texture/normal indices, 0 when absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FaceIndex {
    pub vertex: u32,
    pub texture: u32,
    pub normal: u32,
}

impl FaceIndex {
    pub fn new(vertex: u32, texture: u32, normal: u32) -> Self {
        Self {
            vertex,
            texture,
            normal,
        }
    }
}

impl fmt::Display for FaceIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.texture, self.normal) {
            (0, 0) => write!(f, "{}", self.vertex),
            (t, 0) => write!(f, "{}/{}", self.vertex, t),
            (0, n) => write!(f, "{}//{}", self.vertex, n),
            (t, n) => write!(f, "{}/{}/{}", self.vertex, t, n),
        }
    }
}

/// A loaded OBJ file, triangulated.
#[derive(Debug, Clone, Default)]
pub struct ObjModel {
    /// Geometric vertices (`v`)
    pub vertices: Vec<Vec3>,
    /// Texture coordinates (`vt`)
    pub tex_coords: Vec<Vec2>,
    /// Vertex normals (`vn`)
    pub normals: Vec<Vec3>,
    /// Triangles (`f`), one entry per corner
    pub faces: Vec<[FaceIndex; 3]>,
    /// Group name (`g`)
    pub group_name: Option<String>,
    /// Material library file (`mtllib`)
    pub material_lib: Option<String>,
    /// Material names in order of appearance (`usemtl`)
    pub material_names: Vec<String>,
}

impl ObjModel {
    /// Load and parse an OBJ file from disk.
    pub fn load(path: impl AsRef<Path>) -> ObjResult<Self> {
        let path = path.as_ref();
        let is_obj = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("obj"));
        if !is_obj {
            return Err(ObjError::WrongExtension(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        let model = Self::parse(&content)?;

        log::info!(
            "Loaded {}: {} vertices, {} normals, {} tex coords, {} triangles",
            path.display(),
            model.vertices.len(),
            model.normals.len(),
            model.tex_coords.len(),
            model.faces.len()
        );

        Ok(model)
    }

    /// Parse OBJ text.
    pub fn parse(content: &str) -> ObjResult<Self> {
        let mut model = Self::default();

        // tobj only sees geometry; material names are kept here and the
        // MTL file is never opened. Trailing comments are cut off.
        let mut geometry = String::with_capacity(content.len());
        for raw in content.lines() {
            let line = raw.split('#').next().unwrap_or_default().trim();
            let keyword = line.split_whitespace().next().unwrap_or_default();
            let rest = line[keyword.len()..].trim();

            match keyword {
                "mtllib" => model.material_lib = Some(rest.to_string()),
                "usemtl" => model.material_names.push(rest.to_string()),
                _ => {
                    if keyword == "g" && !rest.is_empty() {
                        model.group_name = Some(rest.to_string());
                    }
                    geometry.push_str(line);
                    geometry.push('\n');
                }
            }
        }

        let options = tobj::LoadOptions {
            single_index: false,
            triangulate: true,
            ignore_points: true,
            ignore_lines: true,
            ..Default::default()
        };
        let (models, _) = tobj::load_obj_buf(&mut Cursor::new(geometry), &options, |_| {
            Err(tobj::LoadError::OpenFileFailed)
        })?;

        for obj in &models {
            model.append_mesh(&obj.name, &obj.mesh);
        }

        Ok(model)
    }

    /// Append one `tobj` mesh, offsetting its indices past what is already stored.
    fn append_mesh(&mut self, name: &str, mesh: &tobj::Mesh) {
        let vertex_base = self.vertices.len() as u32 + 1;
        let texture_base = self.tex_coords.len() as u32 + 1;
        let normal_base = self.normals.len() as u32 + 1;

        self.vertices.extend(
            mesh.positions
                .chunks_exact(3)
                .map(|p| Vec3::new(p[0], p[1], p[2])),
        );
        self.tex_coords
            .extend(mesh.texcoords.chunks_exact(2).map(|t| Vec2::new(t[0], t[1])));
        self.normals.extend(
            mesh.normals
                .chunks_exact(3)
                .map(|n| Vec3::new(n[0], n[1], n[2])),
        );

        // tobj only records attribute indices for corners that have them, so
        // they line up with the positions only when every corner does.
        let corners = mesh.indices.len();
        let textured = mesh.texcoord_indices.len() == corners;
        let with_normals = mesh.normal_indices.len() == corners;
        if !textured && !mesh.texcoord_indices.is_empty() {
            log::warn!("Object '{}' mixes corners with and without texture coordinates; dropping them", name);
        }
        if !with_normals && !mesh.normal_indices.is_empty() {
            log::warn!("Object '{}' mixes corners with and without normals; dropping them", name);
        }

        for (tri, positions) in mesh.indices.chunks_exact(3).enumerate() {
            let face = [0, 1, 2].map(|k| {
                let i = tri * 3 + k;
                FaceIndex::new(
                    vertex_base + positions[k],
                    if textured { texture_base + mesh.texcoord_indices[i] } else { 0 },
                    if with_normals { normal_base + mesh.normal_indices[i] } else { 0 },
                )
            });
            self.faces.push(face);
        }
    }

    /// Geometric vertices as OBJ text.
    pub fn geometric_vertices_string(&self) -> String {
        let mut out = String::new();
        for v in &self.vertices {
            out.push_str(&format!("v {:.4} {:.4} {:.4}\n", v.x, v.y, v.z));
        }
        out
    }

    /// Texture coordinates as OBJ text. The `w` component is always written as zero.
    pub fn texture_coords_string(&self) -> String {
        let mut out = String::new();
        for vt in &self.tex_coords {
            out.push_str(&format!("vt {:.4} {:.4} 0.0000\n", vt.x, vt.y));
        }
        out
    }

    /// Vertex normals as OBJ text.
    pub fn vertex_normals_string(&self) -> String {
        let mut out = String::new();
        for vn in &self.normals {
            out.push_str(&format!("vn {:.4} {:.4} {:.4}\n", vn.x, vn.y, vn.z));
        }
        out
    }

    /// Face elements as OBJ text.
    pub fn face_elements_string(&self) -> String {
        let mut out = String::new();
        for [a, b, c] in &self.faces {
            out.push_str(&format!("f {} {} {}\n", a, b, c));
        }
        out
    }

    /// The whole model as OBJ text.
    ///
    /// Per-face material assignments are not tracked, so every `usemtl`
    /// is written ahead of the faces.
    pub fn to_obj_string(&self) -> String {
        let mut out = String::new();
        if let Some(lib) = &self.material_lib {
            out.push_str(&format!("mtllib {}\n", lib));
        }
        out.push_str(&self.geometric_vertices_string());
        out.push_str(&self.vertex_normals_string());
        out.push_str(&self.texture_coords_string());
        if let Some(group) = &self.group_name {
            out.push_str(&format!("g {}\n", group));
        }
        for name in &self.material_names {
            out.push_str(&format!("usemtl {}\n", name));
        }
        out.push_str(&self.face_elements_string());
        out
    }

    /// Resolve every face into a triangle of positioned vertices.
    ///
    /// Corners without a normal index get a zero (unset) normal.
    pub fn triangle_faces(&self) -> ObjResult<Vec<[Vertex; 3]>> {
        self.faces
            .iter()
            .enumerate()
            .map(|(face_idx, face)| {
                let [a, b, c] = face;
                Ok([
                    self.resolve_corner(face_idx, a)?,
                    self.resolve_corner(face_idx, b)?,
                    self.resolve_corner(face_idx, c)?,
                ])
            })
            .collect()
    }

    fn resolve_corner(&self, face: usize, corner: &FaceIndex) -> ObjResult<Vertex> {
        let position = lookup(&self.vertices, corner.vertex, face, "vertex")?;
        let normal = if corner.normal == 0 {
            Vec3::ZERO
        } else {
            lookup(&self.normals, corner.normal, face, "normal")?
        };
        Ok(Vertex::with_normal(position, normal))
    }
}

fn lookup<T: Copy>(items: &[T], index: u32, face: usize, kind: &'static str) -> ObjResult<T> {
    index
        .checked_sub(1)
        .and_then(|i| items.get(i as usize))
        .copied()
        .ok_or(ObjError::IndexOutOfRange {
            face,
            kind,
            index,
            count: items.len(),
        })
}
