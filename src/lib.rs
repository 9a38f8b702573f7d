//! icon-badger: ribbon badges for app icons
//!
//! This crate draws a rotated ribbon with auto-fitted text over app icon
//! rasters, either for one image file or for every slot of an Xcode
//! `.appiconset`, and can restore an icon set from its backup copy.
//!
//! # Example
//!
//! ```no_run
//! use icon_badger::{
//!     BadgeCompositor, BadgeStyle, Badger, Corner, RibbonAssets, RibbonColor, TextRenderer,
//! };
//! use std::path::Path;
//!
//! let style = BadgeStyle::new("Beta").with_ribbon(RibbonColor::Red, Corner::BottomRight);
//! let compositor = BadgeCompositor::new(RibbonAssets::new("."), TextRenderer::new());
//! let badger = Badger::new(compositor, style);
//!
//! badger.process_icon(Path::new("Icon.png"), Path::new("Icon-beta.png"))?;
//! # Ok::<(), icon_badger::Error>(())
//! ```
//!
//! # Icon sets
//!
//! Batch runs pair each slot of the backup set with the same slot of the live
//! set and badge (or copy back) one file per slot:
//!
//! ```no_run
//! use icon_badger::{batch, BatchAction, IconSet};
//!
//! let original = IconSet::open("Assets.xcassets/AppIconOriginal.appiconset")?;
//! let current = IconSet::open("Assets.xcassets/AppIcon.appiconset")?;
//! let report = batch::run(&original, &current, BatchAction::Restore)?;
//! println!("{report}");
//! # Ok::<(), icon_badger::Error>(())
//! ```

pub mod badge;
pub mod badger;
pub mod batch;
pub mod catalog;
mod error;
mod icon;
pub mod job;
pub mod manifest;
mod style;
pub mod text_source;

#[cfg(feature = "cli")]
pub mod cli;

pub use badge::BadgeCompositor;
pub use badge::geometry::{RectF, RibbonPlacement};
pub use badge::ribbon::{RibbonAsset, RibbonAssets};
pub use badge::text::{GlyphRun, TextRenderer};
pub use badger::{Badger, overlay};
pub use batch::{BatchAction, BatchReport, IconSet};
pub use catalog::{IconSetPaths, find_catalog};
pub use error::{Error, Result};
pub use icon::{CanvasSize, IconImage, SizePx, write_atomic};
pub use job::{IconSetAction, Job, RunSettings};
pub use manifest::{IconManifest, ImageDescriptor};
pub use style::{BadgeStyle, Corner, RibbonColor, format_hex_color, parse_hex_color};
pub use text_source::{BuildEnvironment, TextKeyword, resolve_text};
