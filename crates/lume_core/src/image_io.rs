//! Image output for finished renders.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur while writing an image.
#[derive(Error, Debug)]
pub enum ImageWriteError {
    #[error("Pixel buffer holds {actual} pixels, expected {width}x{height}")]
    SizeMismatch {
        width: u32,
        height: u32,
        actual: usize,
    },

    #[error("Failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Image encoding error: {0}")]
    Encode(#[from] image::ImageError),
}

/// Write 8-bit RGB pixels (row-major, top row first) as an image file.
///
/// The format follows the file extension; `.png` is the expected one.
/// Missing parent directories are created.
pub fn write_png(
    path: impl AsRef<Path>,
    width: u32,
    height: u32,
    pixels: &[[u8; 3]],
) -> Result<(), ImageWriteError> {
    let path = path.as_ref();

    let expected = width as usize * height as usize;
    if pixels.len() != expected || expected == 0 {
        return Err(ImageWriteError::SizeMismatch {
            width,
            height,
            actual: pixels.len(),
        });
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| ImageWriteError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let bytes: &[u8] = bytemuck::cast_slice(pixels);
    image::save_buffer(path, bytes, width, height, image::ColorType::Rgb8)?;

    log::info!("Saved {}x{} image to {}", width, height, path.display());
    Ok(())
}
