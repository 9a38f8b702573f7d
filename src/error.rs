//! Error type shared by every stage of the badging pipeline.
//!
//! Every variant is fatal for the run: the binary prints it and exits with a
//! non-zero status. Manifest entries without a registered file are not errors;
//! the batch driver skips and counts them instead.

use std::path::PathBuf;

/// Crate-wide result alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("could not read input image at {path}")]
    ImageRead {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("could not encode PNG for {path}")]
    ImageEncode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("could not read ribbon file located at {path}")]
    RibbonMissing { path: PathBuf },

    #[error("could not decode ribbon file located at {path}: {reason}")]
    RibbonDecode { path: PathBuf, reason: String },

    #[error("can't get the font named \"{0}\"; make sure it is installed or pass it with --font-file")]
    FontNotFound(String),

    #[error("could not load font file {path}")]
    FontLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("text \"{0}\" does not fit the ribbon at any positive font size")]
    TextDoesNotFit(String),

    #[error("could not build the text layer: {0}")]
    TextLayout(String),

    #[error("invalid canvas size {width}x{height}")]
    InvalidCanvas { width: u32, height: u32 },

    #[error("badge is {badge_width}x{badge_height} but the icon is {icon_width}x{icon_height}")]
    SizeMismatch {
        icon_width: u32,
        icon_height: u32,
        badge_width: u32,
        badge_height: u32,
    },

    #[error("unable to read color from \"{0}\"")]
    InvalidColor(String),

    #[error("text vertical bias must be between -1.0 and 1.0, got {0}")]
    InvalidBias(f32),

    #[error("could not read icon metadata from \"{path}\"")]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse icon metadata from \"{path}\"")]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("error while saving image to disk at {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error while copying image at {from} to {to}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to read the content of {path}")]
    InfoPlistRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to parse {path}")]
    InfoPlistParse {
        path: PathBuf,
        #[source]
        source: quick_xml::Error,
    },

    #[error("missing {0}; run from an Xcode build phase or pass the text explicitly")]
    MissingBuildSetting(&'static str),

    #[error("no \"{name}\" found under {root}")]
    AppIconNotFound { name: String, root: PathBuf },

    #[error("unable to list the project directory {path}")]
    ProjectScan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "\"{name}\" not found at {path}; create a backup copy of the app icon in the same asset catalog or pass --app-icon-original"
    )]
    BackupMissing { name: String, path: PathBuf },

    #[error("{0}")]
    Usage(String),
}
