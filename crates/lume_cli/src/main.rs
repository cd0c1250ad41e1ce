use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use lume_core::{CameraConfig, MaterialDesc, ObjectDesc, SceneDescription};
use lume_renderer::{build_world, render, Camera, CancelToken, Hittable, RenderConfig, Vec3};

/// Render a scene description to a PNG image.
#[derive(Parser, Debug)]
#[command(name = "lume", version, about)]
struct Args {
    /// Scene description (JSON). Renders a built-in demo scene when omitted.
    scene: Option<PathBuf>,
    /// Output image path, overriding the scene's camera setting
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Seed for the random streams
    #[arg(long)]
    seed: Option<u64>,
    /// Worker threads (defaults to one per core)
    #[arg(long)]
    threads: Option<usize>,
    /// Samples per pixel
    #[arg(long)]
    samples: Option<u32>,
    /// Image width in pixels
    #[arg(long)]
    width: Option<u32>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse();

    let (mut desc, base_dir) = match &args.scene {
        Some(path) => {
            let desc = SceneDescription::load(path)
                .with_context(|| format!("Failed to load scene {}", path.display()))?;
            let base_dir = path.parent().unwrap_or(Path::new(".")).to_path_buf();
            (desc, base_dir)
        }
        None => {
            log::info!("No scene given, rendering the demo scene");
            (demo_scene(), PathBuf::from("."))
        }
    };
    apply_overrides(&mut desc, &args);

    let camera = Camera::new(&desc.camera).context("Invalid camera settings")?;
    let world: Hittable = build_world(&desc, &base_dir)
        .context("Failed to build scene")?
        .into();

    let config = RenderConfig {
        seed: desc.seed,
        threads: args.threads,
        ..RenderConfig::default()
    };
    let image = render(&camera, &world, &config, &CancelToken::new()).context("Render failed")?;

    let output = &desc.camera.output;
    image
        .save_png(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    log::info!("Saved {}", output.display());

    Ok(())
}

/// Command line values replace the ones from the scene description.
fn apply_overrides(desc: &mut SceneDescription, args: &Args) {
    if let Some(output) = &args.output {
        desc.camera.output = output.clone();
    }
    if let Some(seed) = args.seed {
        desc.seed = seed;
    }
    if let Some(samples) = args.samples {
        desc.camera.samples_per_pixel = samples;
    }
    if let Some(width) = args.width {
        desc.camera.image_width = width;
    }
}

/// Ground, a glass sphere, and a mirrored quad made of two triangles.
fn demo_scene() -> SceneDescription {
    let mut desc = SceneDescription {
        camera: CameraConfig::default()
            .with_quality(50, 10)
            .with_position(Vec3::new(0.0, 0.5, 1.5), Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_fov(60.0),
        ..SceneDescription::default()
    };

    desc.materials.insert(
        "ground".to_string(),
        MaterialDesc::Lambertian {
            albedo: Vec3::new(0.8, 0.8, 0.0),
        },
    );
    desc.materials.insert(
        "glass".to_string(),
        MaterialDesc::Dielectric {
            refractive_index: 1.5,
        },
    );
    desc.materials.insert(
        "mirror".to_string(),
        MaterialDesc::Metal {
            albedo: Vec3::new(0.8, 0.6, 0.2),
            fuzz: 0.05,
        },
    );

    let corners = [
        Vec3::new(-1.5, -0.5, -2.5),
        Vec3::new(1.5, -0.5, -2.5),
        Vec3::new(1.5, 1.5, -2.5),
        Vec3::new(-1.5, 1.5, -2.5),
    ];
    desc.objects = vec![
        ObjectDesc::Sphere {
            center: Vec3::new(0.0, -100.5, -1.0),
            radius: 100.0,
            material: "ground".to_string(),
        },
        ObjectDesc::Sphere {
            center: Vec3::new(0.0, 0.0, -1.0),
            radius: 0.5,
            material: "glass".to_string(),
        },
        ObjectDesc::Triangle {
            vertices: [corners[0], corners[1], corners[2]],
            normals: None,
            material: "mirror".to_string(),
        },
        ObjectDesc::Triangle {
            vertices: [corners[0], corners[2], corners[3]],
            normals: None,
            material: "mirror".to_string(),
        },
    ];

    desc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_scene_values() {
        let args = Args::parse_from([
            "lume",
            "scene.json",
            "--output",
            "out/frame.png",
            "--seed",
            "9",
            "--samples",
            "3",
            "--threads",
            "2",
        ]);
        assert_eq!(args.scene, Some(PathBuf::from("scene.json")));
        assert_eq!(args.threads, Some(2));

        let mut desc = demo_scene();
        apply_overrides(&mut desc, &args);
        assert_eq!(desc.camera.output, PathBuf::from("out/frame.png"));
        assert_eq!(desc.seed, 9);
        assert_eq!(desc.camera.samples_per_pixel, 3);
        // Untouched values survive
        assert_eq!(desc.camera.max_depth, 10);
    }

    #[test]
    fn test_demo_scene_builds() {
        let desc = demo_scene();
        assert!(Camera::new(&desc.camera).is_ok());

        let scene = build_world(&desc, Path::new(".")).unwrap();
        assert_eq!(scene.len(), 4);
    }

    #[test]
    fn test_bundled_demo_scene_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/scene.json");
        let desc = SceneDescription::load(&path).unwrap();
        let base_dir = path.parent().unwrap();

        let scene = build_world(&desc, base_dir).unwrap();
        // Three spheres, twenty icosahedron faces, one triangle
        assert_eq!(scene.len(), 24);
        assert_eq!(desc.seed, 42);
    }
}
