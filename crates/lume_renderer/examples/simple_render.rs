//! Simple path tracer example.
//!
//! Renders a field of spheres and a glass triangle, then saves a PNG.

use std::sync::Arc;

use lume_renderer::{
    render, CameraConfig, CancelToken, Camera, Color, Dielectric, Hittable, Lambertian,
    Material, Metal, RenderConfig, Scene, Sphere, Triangle, Vec3,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("Lume Path Tracer - Simple Example");
    println!("=================================");

    // Build the scene
    let start = std::time::Instant::now();
    let world = build_scene();
    println!("Scene built in {:?}", start.elapsed());

    // Set up camera
    let config = CameraConfig::default()
        .with_resolution(800, 16.0 / 9.0)
        .with_quality(50, 10)
        .with_position(
            Vec3::new(13.0, 2.0, 3.0), // look_from
            Vec3::new(0.0, 0.0, 0.0),  // look_at
            Vec3::new(0.0, 1.0, 0.0),  // vup
        )
        .with_fov(20.0)
        .with_output("simple_render.png");
    let camera = Camera::new(&config)?;

    println!(
        "Rendering {}x{} @ {} spp...",
        camera.image_width(),
        camera.image_height(),
        camera.samples_per_pixel()
    );

    // Render
    let start = std::time::Instant::now();
    let image = render(&camera, &world, &RenderConfig::default(), &CancelToken::new())?;
    println!("Rendered in {:?}", start.elapsed());

    image.save_png(&config.output)?;
    println!("Saved to {}", config.output.display());

    Ok(())
}

fn build_scene() -> Hittable {
    let mut scene = Scene::new();

    let glass = Arc::new(Material::from(Dielectric::new(1.5)));

    // Ground
    scene.add(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Arc::new(Lambertian::new(Color::new(0.5, 0.5, 0.5)).into()),
    ));

    // Three main spheres
    scene.add(Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0, glass.clone()));
    scene.add(Sphere::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        Arc::new(Lambertian::new(Color::new(0.4, 0.2, 0.1)).into()),
    ));
    scene.add(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0).into()),
    ));

    // Glass fin behind the spheres
    scene.add(Triangle::from_points(
        Vec3::new(-2.0, 0.0, -3.0),
        Vec3::new(2.0, 0.0, -3.0),
        Vec3::new(0.0, 2.5, -3.0),
        glass.clone(),
    ));

    // Small random spheres, fixed seed so every run looks the same
    let mut rng = StdRng::seed_from_u64(2024);

    for a in -5..5 {
        for b in -5..5 {
            let center = Vec3::new(
                a as f32 + 0.9 * rng.gen::<f32>(),
                0.2,
                b as f32 + 0.9 * rng.gen::<f32>(),
            );

            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let choose_mat: f32 = rng.gen();
            let material = if choose_mat < 0.8 {
                // Diffuse
                let albedo = Color::new(
                    rng.gen::<f32>() * rng.gen::<f32>(),
                    rng.gen::<f32>() * rng.gen::<f32>(),
                    rng.gen::<f32>() * rng.gen::<f32>(),
                );
                Arc::new(Lambertian::new(albedo).into())
            } else if choose_mat < 0.95 {
                // Metal
                let albedo = Color::new(
                    0.5 + 0.5 * rng.gen::<f32>(),
                    0.5 + 0.5 * rng.gen::<f32>(),
                    0.5 + 0.5 * rng.gen::<f32>(),
                );
                let fuzz = 0.5 * rng.gen::<f32>();
                Arc::new(Metal::new(albedo, fuzz).into())
            } else {
                glass.clone()
            };
            scene.add(Sphere::new(center, 0.2, material));
        }
    }

    println!("Created {} objects", scene.len());
    scene.into()
}
