//! Badge text keywords.
//!
//! The text option may be one of a few keywords instead of literal text:
//!
//! | keyword           | rendered as                     |
//! |-------------------|---------------------------------|
//! | `alpha`           | `Alpha`                         |
//! | `beta`            | `Beta`                          |
//! | `version`         | `CFBundleShortVersionString`    |
//! | `build`           | `CFBundleVersion`               |
//! | `versionAndBuild` | `<version> - <build>`           |
//!
//! Version and build come from the target's XML `Info.plist`. Values still
//! holding the Xcode placeholders `$(MARKETING_VERSION)` and
//! `$(CURRENT_PROJECT_VERSION)` are taken from the build environment.

use std::collections::HashMap;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::error::{Error, Result};

const VERSION_KEY: &str = "CFBundleShortVersionString";
const BUILD_KEY: &str = "CFBundleVersion";
const MARKETING_VERSION: &str = "MARKETING_VERSION";
const CURRENT_PROJECT_VERSION: &str = "CURRENT_PROJECT_VERSION";

/// Text keywords with a special meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKeyword {
    Alpha,
    Beta,
    Version,
    Build,
    VersionAndBuild,
}

impl TextKeyword {
    /// Matches the exact keyword spelling; anything else is literal text.
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "alpha" => Some(TextKeyword::Alpha),
            "beta" => Some(TextKeyword::Beta),
            "version" => Some(TextKeyword::Version),
            "build" => Some(TextKeyword::Build),
            "versionAndBuild" => Some(TextKeyword::VersionAndBuild),
            _ => None,
        }
    }
}

/// Version settings exported by the build system.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildEnvironment {
    pub marketing_version: Option<String>,
    pub current_project_version: Option<String>,
}

impl BuildEnvironment {
    /// Reads the settings from the process environment.
    pub fn from_env() -> Self {
        Self {
            marketing_version: std::env::var(MARKETING_VERSION).ok(),
            current_project_version: std::env::var(CURRENT_PROJECT_VERSION).ok(),
        }
    }
}

/// Turns the text option into the text drawn on the badge.
pub fn resolve_text(text: &str, info_plist: Option<&Path>, env: &BuildEnvironment) -> Result<String> {
    let Some(keyword) = TextKeyword::parse(text) else {
        return Ok(text.to_string());
    };

    match keyword {
        TextKeyword::Alpha => return Ok("Alpha".to_string()),
        TextKeyword::Beta => return Ok("Beta".to_string()),
        _ => {}
    }

    let path = info_plist.ok_or_else(|| {
        Error::Usage(format!(
            "the \"{text}\" badge text needs --info-plist or INFOPLIST_FILE"
        ))
    })?;
    let (version, build) = read_version(path, env)?;

    let resolved = match keyword {
        TextKeyword::Version => version,
        TextKeyword::Build => build,
        _ => format!("{version} - {build}"),
    };
    log::debug!("badge text \"{text}\" resolved to \"{resolved}\"");
    Ok(resolved)
}

/// Reads `(version, build)` from an `Info.plist`, expanding build placeholders.
pub fn read_version(path: &Path, env: &BuildEnvironment) -> Result<(String, String)> {
    let xml = std::fs::read_to_string(path).map_err(|source| Error::InfoPlistRead {
        path: path.to_path_buf(),
        source,
    })?;
    let mut values = parse_plist_strings(&xml).map_err(|source| Error::InfoPlistParse {
        path: path.to_path_buf(),
        source,
    })?;

    let version = expand(
        values.remove(VERSION_KEY),
        MARKETING_VERSION,
        env.marketing_version.as_deref(),
    )
    .ok_or(Error::MissingBuildSetting(MARKETING_VERSION))?;

    let build = expand(
        values.remove(BUILD_KEY),
        CURRENT_PROJECT_VERSION,
        env.current_project_version.as_deref(),
    )
    .ok_or(Error::MissingBuildSetting(CURRENT_PROJECT_VERSION))?;

    Ok((version, build))
}

fn expand(value: Option<String>, setting: &str, env_value: Option<&str>) -> Option<String> {
    let value = value?;
    if value == format!("$({setting})") {
        env_value.map(str::to_string)
    } else {
        Some(value)
    }
}

/// Collects the `<string>` values of the plist's top-level dictionary.
fn parse_plist_strings(xml: &str) -> std::result::Result<HashMap<String, String>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut values = HashMap::new();
    let mut depth = 0usize;
    let mut element: Option<Vec<u8>> = None;
    let mut key: Option<String> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = e.local_name().as_ref().to_vec();
                // values other than strings still consume the pending key
                if depth == 1 && name != b"key" && name != b"string" {
                    key = None;
                }
                if name == b"dict" || name == b"array" {
                    depth += 1;
                }
                element = Some(name);
            }
            Event::Empty(_) => {
                if depth == 1 {
                    key = None;
                }
            }
            Event::Text(e) => {
                if depth != 1 {
                    continue;
                }
                let text = e.unescape()?.into_owned();
                match element.as_deref() {
                    Some(b"key") => key = Some(text),
                    Some(b"string") => {
                        if let Some(key) = key.take() {
                            values.insert(key, text);
                        }
                    }
                    _ => {}
                }
            }
            Event::End(e) => {
                let name = e.local_name();
                if name.as_ref() == b"dict" || name.as_ref() == b"array" {
                    depth = depth.saturating_sub(1);
                }
                element = None;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(values)
}
