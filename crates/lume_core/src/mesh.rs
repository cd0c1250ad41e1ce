//! Triangle mesh representation.
//!
//! Meshes are flattened into triangles of [`Vertex`] values, ready for the
//! renderer to wrap in primitives. A vertex normal of zero means "unset";
//! the renderer substitutes the flat face normal for such triangles.

use std::path::Path;

use lume_math::Vec3;

use crate::obj::{ObjModel, ObjResult};

/// A mesh corner: position plus an optional (zero when unset) normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
}

impl Vertex {
    /// Create a vertex without a normal.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            normal: Vec3::ZERO,
        }
    }

    /// Create a vertex with an explicit normal.
    pub fn with_normal(position: Vec3, normal: Vec3) -> Self {
        Self { position, normal }
    }

    /// Check if the vertex carries a usable normal.
    pub fn has_normal(&self) -> bool {
        self.normal != Vec3::ZERO
    }
}

impl From<Vec3> for Vertex {
    fn from(position: Vec3) -> Self {
        Self::new(position)
    }
}

/// A list of triangles with resolved positions and normals.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub triangles: Vec<[Vertex; 3]>,
}

impl Mesh {
    /// Create a mesh from already resolved triangles.
    pub fn new(triangles: Vec<[Vertex; 3]>) -> Self {
        Self { triangles }
    }

    /// Load an OBJ file as a mesh.
    ///
    /// With `smooth` set, corners that have no normal in the file get one
    /// averaged from every face sharing that vertex.
    pub fn load_obj(path: impl AsRef<Path>, smooth: bool) -> ObjResult<Self> {
        let model = ObjModel::load(path)?;
        Self::from_obj(&model, smooth)
    }

    /// Build a mesh from a parsed OBJ model.
    pub fn from_obj(model: &ObjModel, smooth: bool) -> ObjResult<Self> {
        let mut triangles = model.triangle_faces()?;

        if smooth {
            let normals = Self::compute_vertex_normals(model);
            let mut filled = 0usize;

            // triangle_faces() keeps face order, one triangle per face.
            for (tri, face) in triangles.iter_mut().zip(&model.faces) {
                for (vertex, corner) in tri.iter_mut().zip(face) {
                    if !vertex.has_normal() {
                        vertex.normal = normals[corner.vertex as usize - 1];
                        filled += 1;
                    }
                }
            }

            log::debug!("Filled {} missing corner normals with smooth normals", filled);
        }

        Ok(Self { triangles })
    }

    /// Average face normals at each geometric vertex.
    ///
    /// Faces use counter-clockwise winding, so `(b - a) x (c - a)` points
    /// outward. Vertices touched by no face, or whose faces cancel out,
    /// get a zero normal.
    fn compute_vertex_normals(model: &ObjModel) -> Vec<Vec3> {
        let vertex_count = model.vertices.len();
        let mut normals = vec![Vec3::ZERO; vertex_count];

        for face in &model.faces {
            let ids = face.map(|corner| corner.vertex);
            if ids.iter().any(|&id| id == 0 || id as usize > vertex_count) {
                continue;
            }
            let [a, b, c] = ids.map(|id| model.vertices[id as usize - 1]);
            let face_normal = (b - a).cross(c - a);
            for id in ids {
                normals[id as usize - 1] += face_normal;
            }
        }

        for normal in &mut normals {
            *normal = normal.normalize_or_zero();
        }

        normals
    }

    /// Get the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Check if every corner of the mesh has a normal.
    pub fn has_normals(&self) -> bool {
        self.triangles
            .iter()
            .all(|tri| tri.iter().all(Vertex::has_normal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lume_math::ApproxEq;

    // Two triangles sharing the edge 1-3, folded along it.
    const FOLDED: &str = "\
v 0 0 0
v 1 0 0
v 0 1 0
v -1 0 1
f 1 2 3
f 1 3 4
";

    #[test]
    fn test_vertex_normal_unset() {
        let v = Vertex::new(Vec3::ONE);
        assert!(!v.has_normal());

        let v = Vertex::with_normal(Vec3::ONE, Vec3::Y);
        assert!(v.has_normal());
    }

    #[test]
    fn test_from_obj_flat() {
        let model = ObjModel::parse(FOLDED).unwrap();
        let mesh = Mesh::from_obj(&model, false).unwrap();

        assert_eq!(mesh.triangle_count(), 2);
        assert!(!mesh.has_normals());
    }

    #[test]
    fn test_from_obj_smooth() {
        let model = ObjModel::parse(FOLDED).unwrap();
        let mesh = Mesh::from_obj(&model, true).unwrap();

        assert!(mesh.has_normals());

        // Vertex 2 belongs only to the first face, whose normal is +Z.
        assert!(mesh.triangles[0][1].normal.approx_eq(&Vec3::Z));

        // Shared vertices blend both faces and stay unit length.
        let shared = mesh.triangles[0][0].normal;
        assert!(shared.length().approx_eq(&1.0));
        assert!(shared.z > 0.0 && shared.x > 0.0);
    }

    #[test]
    fn test_smooth_keeps_file_normals() {
        let text = "\
o lit
v 0 0 0
v 1 0 0
v 0 1 0
vn 0 1 0
f 1//1 2//1 3//1
o bare
v 0 0 1
v 1 0 1
v 0 1 1
f 4 5 6
";
        let model = ObjModel::parse(text).unwrap();
        let mesh = Mesh::from_obj(&model, true).unwrap();

        assert!(mesh.triangles[0].iter().all(|v| v.normal == Vec3::Y));
        assert!(mesh.triangles[1].iter().all(|v| v.normal.approx_eq(&Vec3::Z)));
    }
}
