//! Icon rasters and their on-disk representation.
//!
//! This module provides the pixel buffer the compositors work on, the canvas
//! size derived from it, and the atomic PNG writer used for every output.

use std::io::{Cursor, Write};
use std::path::Path;

use image::{ImageFormat, RgbaImage};

use crate::error::{Error, Result};

/// Whole-pixel raster dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizePx {
    pub width: u32,
    pub height: u32,
}

impl SizePx {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Canvas dimensions used by the badge geometry.
///
/// Always taken from the pixel dimensions of the source raster, never from
/// its logical (point) size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CanvasSize {
    pub width: f32,
    pub height: f32,
}

impl CanvasSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Rounds back to whole pixels, rejecting empty canvases.
    pub fn to_pixels(&self) -> Result<SizePx> {
        let width = self.width.round().max(0.0) as u32;
        let height = self.height.round().max(0.0) as u32;
        if width == 0 || height == 0 {
            return Err(Error::InvalidCanvas { width, height });
        }
        Ok(SizePx::new(width, height))
    }
}

impl From<SizePx> for CanvasSize {
    fn from(size: SizePx) -> Self {
        Self::new(size.width as f32, size.height as f32)
    }
}

/// A decoded icon image in RGBA format.
#[derive(Debug, Clone, PartialEq)]
pub struct IconImage {
    pub data: RgbaImage,
}

impl IconImage {
    pub fn new(data: RgbaImage) -> Self {
        Self { data }
    }

    /// Decodes the image at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let img = image::open(path).map_err(|source| Error::ImageRead {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(img.to_rgba8()))
    }

    /// Pixel dimensions, independent of any point size metadata.
    pub fn dimensions(&self) -> SizePx {
        SizePx::new(self.data.width(), self.data.height())
    }

    /// Canvas size for badge generation.
    pub fn canvas(&self) -> CanvasSize {
        self.dimensions().into()
    }

    /// Encodes the image as PNG.
    pub fn to_png(&self, path_hint: &Path) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.data
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .map_err(|source| Error::ImageEncode {
                path: path_hint.to_path_buf(),
                source,
            })?;
        Ok(buf)
    }

    /// Writes the image as PNG, replacing `path` atomically.
    pub fn save_png(&self, path: &Path) -> Result<()> {
        let png = self.to_png(path)?;
        write_atomic(path, &png).map_err(|source| Error::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Writes `bytes` to a temporary file next to `path` and renames it over
/// `path`, so readers never observe a partially written file.
///
/// An existing file keeps its permissions; a new one is created
/// world-readable.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    match std::fs::metadata(path) {
        Ok(existing) => file.as_file().set_permissions(existing.permissions())?,
        Err(_) => set_new_file_permissions(file.as_file())?,
    }
    file.as_file().sync_all()?;
    file.persist(path).map_err(|err| err.error)?;
    Ok(())
}

#[cfg(unix)]
fn set_new_file_permissions(file: &std::fs::File) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(std::fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn set_new_file_permissions(_file: &std::fs::File) -> std::io::Result<()> {
    Ok(())
}
