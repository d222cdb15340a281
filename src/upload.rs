//! Dish image storage.
//!
//! Uploaded pictures are center-cropped to a square, scaled to
//! [`TARGET_SIZE`] and re-encoded as JPEG under a random file name in the
//! upload directory. Only the file name is stored on the dish.

use std::{
    io::{self, Cursor},
    path::Path,
};

use image::{DynamicImage, codecs::jpeg::JpegEncoder, imageops::FilterType};
use uuid::Uuid;

use crate::{
    dto::admin::UploadedFile,
    error::{AppError, AppResult},
};

/// Extensions accepted from the admin form.
pub const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Edge length of stored images, in pixels.
pub const TARGET_SIZE: u32 = 800;

const JPEG_QUALITY: u8 = 85;

/// Store an uploaded image and return its new file name.
///
/// Returns `Ok(None)` when the upload has no file name or an extension outside
/// [`ALLOWED_EXTENSIONS`]. Content that does not decode as an image is a client error.
pub async fn process_upload_image(
    file: &UploadedFile,
    upload_dir: &Path,
) -> AppResult<Option<String>> {
    if file.filename.is_empty() || !has_allowed_extension(&file.filename) {
        return Ok(None);
    }

    let bytes = file.bytes.clone();
    let encoded = tokio::task::spawn_blocking(move || square_jpeg(&bytes))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("image task failed: {e}")))??;

    let filename = format!("{}.jpg", Uuid::new_v4().simple());
    tokio::fs::create_dir_all(upload_dir)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;
    tokio::fs::write(upload_dir.join(&filename), encoded)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    tracing::debug!(%filename, "stored dish image");
    Ok(Some(filename))
}

/// Delete a stored image. A file that is already gone is not an error.
pub async fn remove_upload(upload_dir: &Path, filename: &str) -> io::Result<()> {
    if filename.is_empty() {
        return Ok(());
    }
    // Stored names never contain separators; refuse anything that could escape the directory.
    if Path::new(filename).file_name().and_then(|n| n.to_str()) != Some(filename) {
        return Ok(());
    }
    match tokio::fs::remove_file(upload_dir.join(filename)).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

fn has_allowed_extension(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
}

fn center_square(img: &DynamicImage) -> DynamicImage {
    let (w, h) = (img.width(), img.height());
    let side = w.min(h);
    let left = (w - side) / 2;
    let top = (h - side) / 2;
    img.crop_imm(left, top, side, side)
}

fn square_jpeg(data: &[u8]) -> AppResult<Vec<u8>> {
    let img = image::load_from_memory(data)
        .map_err(|e| AppError::bad_request(format!("Invalid image: {e}")))?;

    let resized = center_square(&img).resize_exact(TARGET_SIZE, TARGET_SIZE, FilterType::Lanczos3);

    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(Cursor::new(&mut buffer), JPEG_QUALITY);
    resized
        .to_rgb8()
        .write_with_encoder(encoder)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to encode image: {e}")))?;
    Ok(buffer)
}
