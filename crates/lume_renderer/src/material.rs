//! Surface scattering materials.
//!
//! The set of materials is closed, so they are a plain enum dispatched by
//! `match`. Primitives share one material through an `Arc<Material>`.

use lume_math::{near_zero, Ray, Vec3};
use rand::RngCore;

use crate::{gen_f32, hittable::HitRecord};

/// Color type alias (RGB values typically 0-1)
pub type Color = Vec3;

/// Outcome of a scatter that was not absorbed.
#[derive(Debug, Clone, Copy)]
pub struct ScatterResult {
    /// Color filter applied to light arriving along `scattered`
    pub attenuation: Color,
    /// Continuation ray leaving the surface
    pub scattered: Ray,
}

/// How light interacts with a surface.
#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    Lambertian(Lambertian),
    Metal(Metal),
    Dielectric(Dielectric),
}

impl Material {
    /// Scatter an incoming ray.
    ///
    /// Returns `None` if the ray is absorbed.
    pub fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        match self {
            Material::Lambertian(m) => m.scatter(ray_in, rec, rng),
            Material::Metal(m) => m.scatter(ray_in, rec, rng),
            Material::Dielectric(m) => m.scatter(ray_in, rec, rng),
        }
    }
}

impl From<Lambertian> for Material {
    fn from(m: Lambertian) -> Self {
        Material::Lambertian(m)
    }
}

impl From<Metal> for Material {
    fn from(m: Metal) -> Self {
        Material::Metal(m)
    }
}

impl From<Dielectric> for Material {
    fn from(m: Dielectric) -> Self {
        Material::Dielectric(m)
    }
}

/// Lambertian (diffuse) material.
#[derive(Debug, Clone, PartialEq)]
pub struct Lambertian {
    albedo: Color,
}

impl Lambertian {
    /// Create a new Lambertian material with the given albedo color.
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }

    pub fn albedo(&self) -> Color {
        self.albedo
    }

    fn scatter(&self, _ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        let mut scatter_direction = rec.normal + random_unit_vector(rng);

        // Catch degenerate scatter direction
        if near_zero(scatter_direction) {
            scatter_direction = rec.normal;
        }

        Some(ScatterResult {
            attenuation: self.albedo,
            scattered: Ray::new(rec.p, scatter_direction),
        })
    }
}

/// Metal (specular) material.
#[derive(Debug, Clone, PartialEq)]
pub struct Metal {
    albedo: Color,
    fuzz: f32,
}

impl Metal {
    /// Create a new Metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough
    pub fn new(albedo: Color, fuzz: f32) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }

    pub fn fuzz(&self) -> f32 {
        self.fuzz
    }

    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        let reflected = reflect(ray_in.direction().normalize_or_zero(), rec.normal);
        let scattered_dir = if self.fuzz > 0.0 {
            reflected + self.fuzz * random_unit_vector(rng)
        } else {
            reflected
        };

        // Fuzz can push the ray below the surface; those are absorbed.
        if scattered_dir.dot(rec.normal) > 0.0 {
            Some(ScatterResult {
                attenuation: self.albedo,
                scattered: Ray::new(rec.p, scattered_dir),
            })
        } else {
            None
        }
    }
}

/// Dielectric (glass) material.
#[derive(Debug, Clone, PartialEq)]
pub struct Dielectric {
    /// Index of refraction
    ior: f32,
}

impl Dielectric {
    /// Create a new Dielectric material.
    ///
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn new(ior: f32) -> Self {
        Self { ior }
    }

    pub fn refractive_index(&self) -> f32 {
        self.ior
    }

    /// Schlick's approximation for reflectance
    pub fn reflectance(cosine: f32, ior: f32) -> f32 {
        let r0 = ((1.0 - ior) / (1.0 + ior)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }

    /// Snell's law has no solution: total internal reflection.
    pub fn cannot_refract(cos_theta: f32, refraction_ratio: f32) -> bool {
        let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
        refraction_ratio * sin_theta > 1.0
    }

    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        let refraction_ratio = if rec.front_face { 1.0 / self.ior } else { self.ior };

        let unit_direction = ray_in.direction().normalize_or_zero();
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);

        let direction = if Self::cannot_refract(cos_theta, refraction_ratio)
            || Self::reflectance(cos_theta, refraction_ratio) > gen_f32(rng)
        {
            reflect(unit_direction, rec.normal)
        } else {
            refract(unit_direction, rec.normal, refraction_ratio)
        };

        Some(ScatterResult {
            attenuation: Color::ONE,
            scattered: Ray::new(rec.p, direction),
        })
    }
}

// =============================================================================
// Helper functions
// =============================================================================

/// Reflect a vector about a normal.
#[inline]
pub(crate) fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface.
#[inline]
pub(crate) fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

/// Generate a random unit vector on the unit sphere.
pub(crate) fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    // Rejection sampling keeps the distribution uniform on the sphere
    loop {
        let v = Vec3::new(
            gen_f32(rng) * 2.0 - 1.0,
            gen_f32(rng) * 2.0 - 1.0,
            gen_f32(rng) * 2.0 - 1.0,
        );
        let len_sq = v.length_squared();
        if len_sq > 1e-6 && len_sq <= 1.0 {
            return v / len_sq.sqrt();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lume_math::ApproxEq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn record(p: Vec3, normal: Vec3, front_face: bool, material: &Material) -> HitRecord<'_> {
        HitRecord {
            p,
            normal,
            material,
            t: 1.0,
            front_face,
        }
    }

    #[test]
    fn test_random_unit_vector_is_unit() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..1000 {
            assert!(random_unit_vector(&mut rng).length().approx_eq(&1.0));
        }
    }

    #[test]
    fn test_lambertian_always_scatters() {
        let mat = Material::from(Lambertian::new(Color::new(0.5, 0.2, 0.1)));
        let rec = record(Vec3::ZERO, Vec3::Y, true, &mat);
        let ray = Ray::new(Vec3::new(0.0, 1.0, 1.0), Vec3::new(0.0, -1.0, -1.0));
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..1000 {
            let result = mat.scatter(&ray, &rec, &mut rng).expect("lambertian never absorbs");
            assert_eq!(result.attenuation, Color::new(0.5, 0.2, 0.1));
            assert!(result.scattered.direction().length_squared() > 0.0);
            assert_eq!(result.scattered.origin(), Vec3::ZERO);
        }
    }

    #[test]
    fn test_lambertian_stays_in_hemisphere() {
        let mat = Material::from(Lambertian::new(Color::ONE));
        let rec = record(Vec3::ZERO, Vec3::Y, true, &mat);
        let ray = Ray::new(Vec3::Y, -Vec3::Y);
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..1000 {
            let result = mat.scatter(&ray, &rec, &mut rng).unwrap();
            assert!(result.scattered.direction().dot(Vec3::Y) >= 0.0);
        }
    }

    #[test]
    fn test_metal_mirror_reflection() {
        let mat = Material::from(Metal::new(Color::new(0.8, 0.6, 0.2), 0.0));
        let rec = record(Vec3::ZERO, Vec3::Y, true, &mat);
        let ray = Ray::new(Vec3::new(-1.0, 1.0, 0.0), Vec3::new(1.0, -1.0, 0.0));
        let mut rng = StdRng::seed_from_u64(3);

        let result = mat.scatter(&ray, &rec, &mut rng).unwrap();
        let expected = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert!(result.scattered.direction().normalize().approx_eq(&expected));
        assert_eq!(result.attenuation, Color::new(0.8, 0.6, 0.2));
    }

    #[test]
    fn test_metal_fuzz_is_clamped() {
        assert_eq!(Metal::new(Color::ONE, 3.0).fuzz(), 1.0);
        assert_eq!(Metal::new(Color::ONE, -1.0).fuzz(), 0.0);
    }

    #[test]
    fn test_metal_absorbs_below_surface() {
        // A fully fuzzed grazing reflection sometimes dips below the surface.
        let mat = Material::from(Metal::new(Color::ONE, 1.0));
        let rec = record(Vec3::ZERO, Vec3::Y, true, &mat);
        let ray = Ray::new(Vec3::new(-1.0, 0.01, 0.0), Vec3::new(1.0, -0.01, 0.0));
        let mut rng = StdRng::seed_from_u64(5);

        let mut absorbed = 0;
        for _ in 0..1000 {
            match mat.scatter(&ray, &rec, &mut rng) {
                Some(result) => assert!(result.scattered.direction().dot(Vec3::Y) > 0.0),
                None => absorbed += 1,
            }
        }
        assert!(absorbed > 0);
    }

    #[test]
    fn test_reflectance() {
        // Normal incidence on glass reflects about 4%
        let r = Dielectric::reflectance(1.0, 1.0 / 1.5);
        assert!((r - 0.04).abs() < 1e-3);

        // Grazing incidence reflects everything
        assert!(Dielectric::reflectance(0.0, 1.5).approx_eq(&1.0));
    }

    #[test]
    fn test_dielectric_near_normal_mostly_refracts() {
        let mat = Material::from(Dielectric::new(1.5));
        let rec = record(Vec3::ZERO, Vec3::Y, true, &mat);
        let ray = Ray::new(Vec3::Y, Vec3::new(0.01, -1.0, 0.0));
        let mut rng = StdRng::seed_from_u64(42);

        let mut refracted = 0;
        for _ in 0..1000 {
            let result = mat.scatter(&ray, &rec, &mut rng).unwrap();
            assert_eq!(result.attenuation, Color::ONE);
            if result.scattered.direction().y < 0.0 {
                refracted += 1;
            }
        }
        assert!(refracted > 900, "only {} of 1000 rays refracted", refracted);
    }

    #[test]
    fn test_dielectric_total_internal_reflection() {
        // Leaving glass at a grazing angle: beyond the critical angle.
        let mat = Material::from(Dielectric::new(1.5));
        let rec = record(Vec3::ZERO, Vec3::Y, false, &mat);
        let ray = Ray::new(Vec3::new(-1.0, 0.1, 0.0), Vec3::new(1.0, -0.1, 0.0));

        let cos_theta = (-ray.direction().normalize()).dot(rec.normal);
        assert!(Dielectric::cannot_refract(cos_theta, 1.5));

        for seed in 0..100 {
            let mut rng = StdRng::seed_from_u64(seed);
            let result = mat.scatter(&ray, &rec, &mut rng).unwrap();
            let expected = Vec3::new(1.0, 0.1, 0.0).normalize();
            assert!(result.scattered.direction().approx_eq(&expected));
        }
    }

    #[test]
    fn test_refract_straight_through() {
        let out = refract(-Vec3::Y, Vec3::Y, 1.0 / 1.5);
        assert!(out.approx_eq(&-Vec3::Y));
    }
}
