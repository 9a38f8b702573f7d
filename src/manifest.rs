//! Icon-set manifest (`Contents.json`) model.
//!
//! An `.appiconset` folder describes its images in a JSON sidecar:
//!
//! ```json
//! {
//!   "images": [
//!     { "size": "60x60", "idiom": "iphone", "filename": "Icon-120.png", "scale": "2x" },
//!     { "size": "20x20", "idiom": "ipad", "scale": "1x" }
//!   ],
//!   "info": { "version": 1, "author": "xcode" }
//! }
//! ```
//!
//! Entries without a `filename` are empty slots. Keys this crate does not use
//! (`info`, `role`, `subtype`, `platform`, ...) are ignored.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Name of the manifest file inside an icon-set folder.
pub const MANIFEST_FILE_NAME: &str = "Contents.json";

// ============================================================================
// ImageDescriptor
// ============================================================================

/// One image slot of an icon set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDescriptor {
    /// Logical size, e.g. `"60x60"`.
    pub size: String,

    /// Device family, e.g. `"iphone"` or `"ios-marketing"`.
    pub idiom: String,

    /// Image file inside the icon-set folder; `None` for an empty slot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    /// Pixel density, e.g. `"2x"`.
    pub scale: String,
}

impl ImageDescriptor {
    pub fn new(size: impl Into<String>, idiom: impl Into<String>, scale: impl Into<String>) -> Self {
        Self {
            size: size.into(),
            idiom: idiom.into(),
            filename: None,
            scale: scale.into(),
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// True if this descriptor is for the given slot.
    pub fn matches(&self, size: &str, scale: &str, idiom: &str) -> bool {
        self.size == size && self.scale == scale && self.idiom == idiom
    }

    /// Human-readable slot name used in log lines.
    pub fn slot(&self) -> String {
        format!(
            "idiom \"{}\" size \"{}\" scale \"{}\"",
            self.idiom, self.size, self.scale
        )
    }
}

// ============================================================================
// IconManifest
// ============================================================================

/// Ordered image descriptors of one icon set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconManifest {
    pub images: Vec<ImageDescriptor>,
}

impl IconManifest {
    pub fn new(images: Vec<ImageDescriptor>) -> Self {
        Self { images }
    }

    /// Reads `Contents.json` from an icon-set folder.
    pub fn load(icon_set_dir: &Path) -> Result<Self> {
        let path = icon_set_dir.join(MANIFEST_FILE_NAME);
        let json = std::fs::read_to_string(&path).map_err(|source| Error::ManifestRead {
            path: path.clone(),
            source,
        })?;
        let manifest = Self::from_json(&json)
            .map_err(|source| Error::ManifestParse { path: path.clone(), source })?;

        log::debug!(
            "loaded {} image descriptors from {}",
            manifest.images.len(),
            path.display()
        );
        Ok(manifest)
    }

    /// Deserializes a manifest from JSON.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Serializes the manifest to pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// First descriptor for the `(size, scale, idiom)` slot.
    pub fn image_info(&self, size: &str, scale: &str, idiom: &str) -> Option<&ImageDescriptor> {
        self.images
            .iter()
            .find(|image| image.matches(size, scale, idiom))
    }

    /// Filename registered for the slot, if any.
    pub fn filename_for(&self, size: &str, scale: &str, idiom: &str) -> Option<&str> {
        self.image_info(size, scale, idiom)?.filename.as_deref()
    }
}

// ============================================================================
// Tests
// ============================================================================
