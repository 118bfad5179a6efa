//! PNG export of generated buffers

use image::{ImageBuffer, Rgba};
use std::path::Path;

use crate::io::error::{GenerationError, Result};
use crate::io::output::GeneratedImage;

/// Write a generated buffer to disk as an RGBA PNG
///
/// Missing parent directories are created.
///
/// # Errors
///
/// Returns an error if:
/// - The buffer length does not match the metadata dimensions
/// - The parent directory cannot be created
/// - The image cannot be saved to the specified path
pub fn export_png(image: &GeneratedImage, output_path: &Path) -> Result<()> {
    let (width, height) = (image.metadata.width, image.metadata.height);
    let img: ImageBuffer<Rgba<u8>, &[u8]> =
        ImageBuffer::from_raw(width, height, image.buffer.as_slice()).ok_or_else(|| {
            GenerationError::Computation {
                operation: "png export",
                reason: format!(
                    "buffer holds {} bytes, expected {} for {width}x{height}",
                    image.buffer.len(),
                    u64::from(width) * u64::from(height) * 4
                ),
            }
        })?;

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| GenerationError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    img.save(output_path)
        .map_err(|e| GenerationError::ImageExport {
            path: output_path.to_path_buf(),
            source: e,
        })?;

    log::info!(
        "wrote {width}x{height} image to {}",
        output_path.display()
    );
    Ok(())
}
