//! Turn a scene description into renderable geometry.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use lume_core::{MaterialDesc, Mesh, ObjError, ObjectDesc, SceneDescription, Vertex};
use thiserror::Error;

use crate::{Dielectric, Lambertian, Material, Metal, Scene, Sphere, Triangle};

/// Errors that can occur while building a world.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Object {object} uses unknown material '{name}'")]
    UnknownMaterial { object: usize, name: String },

    #[error("Material '{name}' is invalid: {reason}")]
    InvalidMaterial { name: String, reason: String },

    #[error("Object {object} has invalid geometry: {reason}")]
    InvalidGeometry { object: usize, reason: String },

    #[error("Failed to load mesh {}: {source}", path.display())]
    Mesh {
        path: PathBuf,
        #[source]
        source: ObjError,
    },
}

/// Build a world from a scene description.
///
/// Each named material is created once and shared by every object that uses
/// it. Relative mesh paths resolve against `base_dir`.
pub fn build_world(desc: &SceneDescription, base_dir: &Path) -> Result<Scene, BuildError> {
    let materials = build_materials(&desc.materials)?;
    let mut scene = Scene::new();

    for (index, object) in desc.objects.iter().enumerate() {
        let material = materials
            .get(object.material())
            .cloned()
            .ok_or_else(|| BuildError::UnknownMaterial {
                object: index,
                name: object.material().to_string(),
            })?;

        match object {
            ObjectDesc::Sphere { center, radius, .. } => {
                if *radius <= 0.0 {
                    return Err(BuildError::InvalidGeometry {
                        object: index,
                        reason: format!("sphere radius must be positive, got {radius}"),
                    });
                }
                scene.add(Sphere::new(*center, *radius, material));
            }
            ObjectDesc::Triangle {
                vertices, normals, ..
            } => {
                let corners = match normals {
                    Some(n) => [0, 1, 2].map(|i| Vertex::with_normal(vertices[i], n[i])),
                    None => vertices.map(Vertex::new),
                };
                let [a, b, c] = corners;
                scene.add(Triangle::new(a, b, c, material));
            }
            ObjectDesc::Mesh { path, smooth, .. } => {
                let full_path = base_dir.join(path);
                let mesh = Mesh::load_obj(&full_path, *smooth).map_err(|source| {
                    BuildError::Mesh {
                        path: full_path.clone(),
                        source,
                    }
                })?;
                if mesh.triangles.is_empty() {
                    log::warn!("Mesh {} has no faces", full_path.display());
                }
                scene.extend(
                    mesh.triangles
                        .into_iter()
                        .map(|[a, b, c]| Triangle::new(a, b, c, material.clone())),
                );
            }
        }
    }

    log::info!(
        "Built world: {} materials, {} primitives",
        materials.len(),
        scene.len()
    );

    Ok(scene)
}

fn build_materials(
    descs: &BTreeMap<String, MaterialDesc>,
) -> Result<BTreeMap<String, Arc<Material>>, BuildError> {
    descs
        .iter()
        .map(|(name, desc)| {
            let material: Material = match *desc {
                MaterialDesc::Lambertian { albedo } => Lambertian::new(albedo).into(),
                MaterialDesc::Metal { albedo, fuzz } => Metal::new(albedo, fuzz).into(),
                MaterialDesc::Dielectric { refractive_index } => {
                    if !(refractive_index > 0.0) {
                        return Err(BuildError::InvalidMaterial {
                            name: name.clone(),
                            reason: format!(
                                "refractive index must be positive, got {refractive_index}"
                            ),
                        });
                    }
                    Dielectric::new(refractive_index).into()
                }
            };
            Ok((name.clone(), Arc::new(material)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Hittable, Interval, Ray, Vec3};

    const SCENE: &str = r#"{
        "materials": {
            "ground": { "type": "lambertian", "albedo": [0.8, 0.8, 0.0] },
            "mirror": { "type": "metal", "albedo": [1.0, 1.0, 1.0], "fuzz": 0.0 }
        },
        "objects": [
            { "type": "sphere", "center": [0.0, -100.5, -1.0], "radius": 100.0, "material": "ground" },
            { "type": "triangle", "vertices": [[-1, -1, -2], [1, -1, -2], [0, 1, -2]], "material": "mirror" }
        ]
    }"#;

    #[test]
    fn test_build_world() {
        let desc = SceneDescription::from_json(SCENE).unwrap();
        let scene = build_world(&desc, Path::new(".")).unwrap();
        assert_eq!(scene.len(), 2);

        let world = Hittable::from(scene);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let rec = world.hit(&ray, Interval::new(0.001, f32::INFINITY)).unwrap();
        assert!((rec.t - 2.0).abs() < 1e-4);
        assert!(matches!(rec.material, Material::Metal(_)));
    }

    #[test]
    fn test_unknown_material() {
        let mut desc = SceneDescription::from_json(SCENE).unwrap();
        desc.materials.remove("mirror");

        let err = build_world(&desc, Path::new(".")).unwrap_err();
        assert!(matches!(
            err,
            BuildError::UnknownMaterial { object: 1, ref name } if name == "mirror"
        ));
    }

    #[test]
    fn test_invalid_dielectric() {
        let mut desc = SceneDescription::from_json(SCENE).unwrap();
        desc.materials.insert(
            "glass".to_string(),
            MaterialDesc::Dielectric {
                refractive_index: 0.0,
            },
        );
        let err = build_world(&desc, Path::new(".")).unwrap_err();
        assert!(matches!(err, BuildError::InvalidMaterial { .. }));
    }

    #[test]
    fn test_invalid_sphere_radius() {
        let mut desc = SceneDescription::from_json(SCENE).unwrap();
        desc.objects.push(ObjectDesc::Sphere {
            center: Vec3::ZERO,
            radius: -1.0,
            material: "ground".to_string(),
        });
        let err = build_world(&desc, Path::new(".")).unwrap_err();
        assert!(matches!(err, BuildError::InvalidGeometry { object: 2, .. }));
    }

    #[test]
    fn test_mesh_relative_to_base_dir() {
        let dir = std::env::temp_dir().join(format!("lume_world_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("quad.obj"),
            "v -1 -1 -3\nv 1 -1 -3\nv 1 1 -3\nv -1 1 -3\nf 1 2 3 4\n",
        )
        .unwrap();

        let mut desc = SceneDescription::from_json(SCENE).unwrap();
        desc.objects.push(ObjectDesc::Mesh {
            path: PathBuf::from("quad.obj"),
            material: "ground".to_string(),
            smooth: false,
        });
        let scene = build_world(&desc, &dir).unwrap();
        // Quad fans into two triangles
        assert_eq!(scene.len(), 4);

        desc.objects.push(ObjectDesc::Mesh {
            path: PathBuf::from("missing.obj"),
            material: "ground".to_string(),
            smooth: false,
        });
        let err = build_world(&desc, &dir).unwrap_err();
        assert!(matches!(err, BuildError::Mesh { .. }));

        std::fs::remove_dir_all(&dir).ok();
    }
}
