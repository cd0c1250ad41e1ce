//! Triangle primitive for ray tracing.
//!
//! Intersects the supporting plane first, then runs an edge-function test
//! against each edge. The same edge values give the barycentric weights
//! used to interpolate vertex normals, so flat triangles can shade smoothly
//! while the geometric normal still decides front and back.

use std::sync::Arc;

use lume_core::Vertex;
use lume_math::{Interval, Ray, Vec3};

use crate::{hittable::HitRecord, Material};

/// Rays closer than this to the plane (by `|n . d|`) count as parallel.
const PARALLEL_EPSILON: f32 = 1e-8;

/// A triangle primitive.
#[derive(Debug, Clone)]
pub struct Triangle {
    /// Corners in counter-clockwise order
    a: Vertex,
    b: Vertex,
    c: Vertex,
    /// Face normal `(b - a) x (c - a)`, not normalized
    normal: Vec3,
    material: Arc<Material>,
}

impl Triangle {
    /// Create a triangle from three corners.
    ///
    /// If any corner lacks a normal, all three corners get the flat face
    /// normal instead.
    pub fn new(a: Vertex, b: Vertex, c: Vertex, material: Arc<Material>) -> Self {
        let normal = (b.position - a.position).cross(c.position - a.position);

        let (mut a, mut b, mut c) = (a, b, c);
        if !(a.has_normal() && b.has_normal() && c.has_normal()) {
            let flat = normal.normalize_or_zero();
            a.normal = flat;
            b.normal = flat;
            c.normal = flat;
        }

        Self {
            a,
            b,
            c,
            normal,
            material,
        }
    }

    /// Create a triangle from bare positions (flat shaded).
    pub fn from_points(a: Vec3, b: Vec3, c: Vec3, material: Arc<Material>) -> Self {
        Self::new(a.into(), b.into(), c.into(), material)
    }

    /// Unit face normal, or zero for a degenerate triangle.
    pub fn face_normal(&self) -> Vec3 {
        self.normal.normalize_or_zero()
    }

    pub fn vertices(&self) -> [Vertex; 3] {
        [self.a, self.b, self.c]
    }

    /// Barycentric weights `[wa, wb, wc]` of a point on the triangle's plane,
    /// or `None` if it falls outside any edge.
    ///
    /// Each edge value `n . (edge x (p - start))` is twice the signed area of
    /// the sub-triangle opposite a corner, scaled by `|n|`. Dividing by `|n|^2`
    /// turns all three into weights that sum to one.
    pub fn barycentric(&self, p: Vec3) -> Option<[f32; 3]> {
        let (a, b, c) = (self.a.position, self.b.position, self.c.position);

        // Edge AB, weight of C
        let wc = self.normal.dot((b - a).cross(p - a));
        if wc < 0.0 {
            return None;
        }

        // Edge BC, weight of A
        let wa = self.normal.dot((c - b).cross(p - b));
        if wa < 0.0 {
            return None;
        }

        // Edge CA, weight of B
        let wb = self.normal.dot((a - c).cross(p - c));
        if wb < 0.0 {
            return None;
        }

        let denom = self.normal.length_squared();
        if denom == 0.0 {
            return None;
        }

        Some([wa / denom, wb / denom, wc / denom])
    }

    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        // A ray parallel to the plane never crosses it
        let nd = self.normal.dot(ray.direction());
        if nd.abs() < PARALLEL_EPSILON {
            return None;
        }

        let d = self.normal.dot(self.a.position);
        let t = (d - self.normal.dot(ray.origin())) / nd;
        if !ray_t.surrounds(t) {
            return None;
        }

        let p = ray.at(t);
        let [wa, wb, wc] = self.barycentric(p)?;

        let outward = self.face_normal();
        let shading = (wa * self.a.normal + wb * self.b.normal + wc * self.c.normal)
            .try_normalize()
            .unwrap_or(outward);

        let mut rec = HitRecord::new(ray, t, outward, &self.material);
        rec.set_face_normal_shaded(ray, outward, shading);
        Some(rec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;
    use lume_math::ApproxEq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn material() -> Arc<Material> {
        Arc::new(Lambertian::new(Vec3::new(0.5, 0.5, 0.5)).into())
    }

    fn window() -> Interval {
        Interval::new(0.001, f32::INFINITY)
    }

    fn test_triangle() -> Triangle {
        Triangle::from_points(
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            material(),
        )
    }

    #[test]
    fn test_triangle_hit() {
        let tri = test_triangle();
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));

        let rec = tri.hit(&ray, window()).expect("ray through interior must hit");
        assert!(rec.t.approx_eq(&5.0));
        assert!(rec.p.approx_eq(&Vec3::ZERO));
        assert!(rec.normal.approx_eq(&Vec3::Z));
        assert!(rec.front_face);
    }

    #[test]
    fn test_triangle_miss_outside_edges() {
        let tri = test_triangle();
        let ray = Ray::new(Vec3::new(2.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(tri.hit(&ray, window()).is_none());
    }

    #[test]
    fn test_triangle_miss_parallel() {
        let tri = test_triangle();
        let ray = Ray::new(Vec3::new(0.0, 0.0, 1.0), Vec3::new(1.0, 0.0, 0.0));
        assert!(tri.hit(&ray, window()).is_none());
    }

    #[test]
    fn test_triangle_miss_behind() {
        let tri = test_triangle();
        // Plane is behind the ray origin
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(tri.hit(&ray, window()).is_none());
    }

    #[test]
    fn test_triangle_back_face() {
        let tri = test_triangle();
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0));

        let rec = tri.hit(&ray, window()).unwrap();
        assert!(!rec.front_face);
        assert!(rec.normal.approx_eq(&-Vec3::Z));
    }

    #[test]
    fn test_barycentric_reconstructs_point() {
        let tri = Triangle::from_points(
            Vec3::new(0.3, -1.2, 2.0),
            Vec3::new(2.5, 0.4, -1.0),
            Vec3::new(-0.7, 1.9, 0.5),
            material(),
        );
        let [a, b, c] = tri.vertices().map(|v| v.position);
        let mut rng = StdRng::seed_from_u64(9);

        for _ in 0..200 {
            // Uniform point in the triangle
            let (mut s, mut r) = (rng.gen::<f32>(), rng.gen::<f32>());
            if s + r > 1.0 {
                s = 1.0 - s;
                r = 1.0 - r;
            }
            let p = a + s * (b - a) + r * (c - a);

            let [wa, wb, wc] = tri.barycentric(p).expect("point lies inside");
            assert!((wa + wb + wc).approx_eq(&1.0));
            assert!((wa * a + wb * b + wc * c).approx_eq(&p));
        }
    }

    #[test]
    fn test_barycentric_at_corners() {
        let tri = test_triangle();
        let [wa, wb, wc] = tri.barycentric(Vec3::new(-1.0, -1.0, 0.0)).unwrap();
        assert!(wa.approx_eq(&1.0));
        assert!(wb.approx_eq(&0.0));
        assert!(wc.approx_eq(&0.0));
    }

    #[test]
    fn test_missing_normal_uses_face_normal() {
        let tri = Triangle::new(
            Vertex::with_normal(Vec3::new(-1.0, -1.0, 0.0), Vec3::X),
            Vertex::new(Vec3::new(1.0, -1.0, 0.0)),
            Vertex::with_normal(Vec3::new(0.0, 1.0, 0.0), Vec3::Y),
            material(),
        );

        for v in tri.vertices() {
            assert_eq!(v.normal, Vec3::Z);
        }
    }

    #[test]
    fn test_smooth_shading_normal() {
        let tilt = Vec3::new(0.0, 1.0, 1.0).normalize();
        let tri = Triangle::new(
            Vertex::with_normal(Vec3::new(-1.0, -1.0, 0.0), Vec3::Z),
            Vertex::with_normal(Vec3::new(1.0, -1.0, 0.0), Vec3::Z),
            Vertex::with_normal(Vec3::new(0.0, 1.0, 0.0), tilt),
            material(),
        );

        // Near corner C the shading normal leans toward C's normal
        let ray = Ray::new(Vec3::new(0.0, 0.9, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let rec = tri.hit(&ray, window()).unwrap();
        assert!(rec.front_face);
        assert!(rec.normal.length().approx_eq(&1.0));
        assert!(rec.normal.y > 0.5);

        // Near the AB edge it stays close to the flat normal
        let ray = Ray::new(Vec3::new(0.0, -0.9, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let rec = tri.hit(&ray, window()).unwrap();
        assert!(rec.normal.z > 0.99);
    }

    #[test]
    fn test_degenerate_triangle_never_hits() {
        let tri = Triangle::from_points(Vec3::ZERO, Vec3::X, Vec3::new(2.0, 0.0, 0.0), material());
        let ray = Ray::new(Vec3::new(0.5, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(tri.hit(&ray, window()).is_none());
        assert_eq!(tri.face_normal(), Vec3::ZERO);
    }
}
