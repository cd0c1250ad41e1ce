//! Hittable objects and HitRecord for ray-object intersection.

use lume_math::{Interval, Ray, Vec3};

use crate::{Material, Sphere, Triangle};

/// Record of a ray-object intersection.
#[derive(Debug, Clone, Copy)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub p: Vec3,
    /// Unit surface normal at intersection (always points against ray)
    pub normal: Vec3,
    /// Material at the intersection point
    pub material: &'a Material,
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
}

impl<'a> HitRecord<'a> {
    /// Build a record for a hit at `t`, orienting `outward_normal` against the ray.
    pub fn new(ray: &Ray, t: f32, outward_normal: Vec3, material: &'a Material) -> Self {
        let mut rec = Self {
            p: ray.at(t),
            normal: outward_normal,
            material,
            t,
            front_face: true,
        };
        rec.set_face_normal(ray, outward_normal);
        rec
    }

    /// Set the face normal based on ray direction and outward normal.
    ///
    /// `outward_normal` must be unit length. The stored normal always points
    /// against the ray, so `front_face` remembers which side was hit.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        self.set_face_normal_shaded(ray, outward_normal, outward_normal);
    }

    /// Like [`set_face_normal`](Self::set_face_normal), but the side is decided
    /// by the geometric `outward_normal` while the stored normal comes from
    /// `shading_normal` (e.g. interpolated vertex normals).
    pub fn set_face_normal_shaded(&mut self, ray: &Ray, outward_normal: Vec3, shading_normal: Vec3) {
        // If the ray and normal point in the same direction, we're inside
        self.front_face = ray.direction().dot(outward_normal) <= 0.0;

        self.normal = if self.front_face {
            shading_normal
        } else {
            -shading_normal
        };
    }
}

/// Anything a ray can hit.
///
/// The variant set is closed; `Scene` nests other hittables.
#[derive(Debug, Clone)]
pub enum Hittable {
    Sphere(Sphere),
    Triangle(Triangle),
    Scene(Scene),
}

impl Hittable {
    /// Test if a ray hits this object with `t` inside `ray_t`.
    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        match self {
            Hittable::Sphere(sphere) => sphere.hit(ray, ray_t),
            Hittable::Triangle(triangle) => triangle.hit(ray, ray_t),
            Hittable::Scene(scene) => scene.hit(ray, ray_t),
        }
    }
}

impl From<Sphere> for Hittable {
    fn from(sphere: Sphere) -> Self {
        Hittable::Sphere(sphere)
    }
}

impl From<Triangle> for Hittable {
    fn from(triangle: Triangle) -> Self {
        Hittable::Triangle(triangle)
    }
}

impl From<Scene> for Hittable {
    fn from(scene: Scene) -> Self {
        Hittable::Scene(scene)
    }
}

/// An ordered list of hittable objects that reports the nearest hit.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    objects: Vec<Hittable>,
}

impl Scene {
    /// Create a new empty scene.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    /// Add an object to the scene.
    pub fn add(&mut self, object: impl Into<Hittable>) {
        self.objects.push(object.into());
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the scene is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Nearest hit across all objects.
    ///
    /// The acceptance window shrinks to each hit found, so a farther object
    /// tested later can never replace a nearer one.
    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let mut closest = None;
        let mut window = ray_t;

        for object in &self.objects {
            if let Some(rec) = object.hit(ray, window) {
                window = window.with_max(rec.t);
                closest = Some(rec);
            }
        }

        closest
    }
}

impl<H: Into<Hittable>> Extend<H> for Scene {
    fn extend<I: IntoIterator<Item = H>>(&mut self, iter: I) {
        self.objects.extend(iter.into_iter().map(Into::into));
    }
}

impl<H: Into<Hittable>> FromIterator<H> for Scene {
    fn from_iter<I: IntoIterator<Item = H>>(iter: I) -> Self {
        let mut scene = Scene::new();
        scene.extend(iter);
        scene
    }
}
