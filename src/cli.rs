//! Command line surface.
//!
//! `icon-badger [target] [OPTIONS]` badges an app icon set inside an asset
//! catalog (the default command); `icon-badger icon -i <in> -o <out>` badges a
//! single image file. Xcode build-phase variables fill in anything not given
//! on the command line.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use palette::Srgba;

use crate::batch::IconSet;
use crate::catalog::{IconSetPaths, find_catalog};
use crate::error::{Error, Result};
use crate::job::{IconSetAction, Job, RunSettings};
use crate::style::{BadgeStyle, Corner, RibbonColor, parse_hex_color};
use crate::text_source::{BuildEnvironment, resolve_text};

/// Folder under `PODS_ROOT` holding the bundled resources.
const PODS_RESOURCES_DIR: &str = "IconBadger";

#[derive(Debug, Parser)]
#[command(
    name = "icon-badger",
    version,
    about = "Add a ribbon badge with text to app icons",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub target: TargetArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Badge every icon of an app icon set from its backup copy (default)
    Target(TargetArgs),

    /// Badge a single icon file
    Icon(IconArgs),
}

/// Options shared by both commands.
#[derive(Debug, Clone, Args)]
pub struct StyleOptions {
    /// Badge text: alpha, beta, version, build, versionAndBuild, or any custom text
    #[arg(short, long, default_value = "")]
    pub text: String,

    /// Text color as #RRGGBBAA (or #RRGGBB)
    #[arg(long, value_parser = parse_hex_color, default_value = "#FFFFFFFF")]
    pub text_color: Srgba<u8>,

    /// PostScript or family name of the text font
    #[arg(long, default_value = BadgeStyle::DEFAULT_FONT)]
    pub text_font_name: String,

    /// Cut the text out of the ribbon so the icon shows through
    #[arg(long)]
    pub text_as_mask: bool,

    /// Vertical text offset between -1.0 and 1.0, in ribbon heights
    #[arg(long, value_name = "x", default_value_t = 0.0, allow_negative_numbers = true)]
    pub text_vertical_bias: f32,

    /// Corner the ribbon is drawn in
    #[arg(long, value_enum, default_value = "bottom-right")]
    pub ribbon_position: Corner,

    /// Ribbon color
    #[arg(long, value_enum, default_value = "cyan")]
    pub ribbon_color: RibbonColor,

    /// Folder containing resources/ribbons [default: $PODS_ROOT/IconBadger]
    #[arg(long)]
    pub resources_root_path: Option<PathBuf>,

    /// Info.plist of the current target, used by the version keywords
    #[arg(long, env = "INFOPLIST_FILE")]
    pub info_plist: Option<PathBuf>,

    /// Extra font file to load (repeatable)
    #[arg(long = "font-file", value_name = "PATH")]
    pub font_files: Vec<PathBuf>,

    /// Show extra logging for debugging purposes
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Args)]
pub struct TargetArgs {
    #[command(flatten)]
    pub options: StyleOptions,

    /// Name of the app icon set in the asset catalog
    #[arg(long, default_value = "AppIcon")]
    pub app_icon: String,

    /// Name of the untouched backup icon set in the same asset catalog
    #[arg(long, default_value = "AppIconOriginal")]
    pub app_icon_original: String,

    /// Asset catalog path [default: searched under $SRCROOT]
    #[arg(long)]
    pub assets_catalog: Option<PathBuf>,

    /// Copy the backup icons back instead of badging
    #[arg(long)]
    pub restore_original: bool,
}

#[derive(Debug, Clone, Args)]
pub struct IconArgs {
    #[command(flatten)]
    pub options: StyleOptions,

    /// Icon to badge
    #[arg(short, long)]
    pub input_icon: PathBuf,

    /// Where the badged icon is written
    #[arg(short, long)]
    pub output_icon: PathBuf,
}

/// Build-phase variables consulted when options are omitted.
#[derive(Debug, Clone, Default)]
pub struct ProcessEnv {
    pub pods_root: Option<PathBuf>,
    pub src_root: Option<PathBuf>,
    pub build: BuildEnvironment,
}

impl ProcessEnv {
    pub fn from_env() -> Self {
        Self {
            pods_root: std::env::var_os("PODS_ROOT").map(PathBuf::from),
            src_root: std::env::var_os("SRCROOT").map(PathBuf::from),
            build: BuildEnvironment::from_env(),
        }
    }
}

impl Cli {
    pub fn options(&self) -> &StyleOptions {
        match &self.command {
            Some(Command::Target(target)) => &target.options,
            Some(Command::Icon(icon)) => &icon.options,
            None => &self.target.options,
        }
    }

    pub fn verbose(&self) -> bool {
        self.options().verbose
    }

    /// Resolves the parsed arguments into a job.
    pub fn into_job(self, env: &ProcessEnv) -> Result<(Job, RunSettings)> {
        match self.command {
            Some(Command::Icon(icon)) => icon_job(icon, env),
            Some(Command::Target(target)) => target_job(target, env),
            None => target_job(self.target, env),
        }
    }
}

fn icon_job(args: IconArgs, env: &ProcessEnv) -> Result<(Job, RunSettings)> {
    if args.options.text.is_empty() {
        return Err(Error::Usage("missing expected argument '--text <text>'".into()));
    }

    let style = build_style(&args.options, env)?;
    let settings = run_settings(&args.options, env)?;
    let job = Job::Icon {
        style,
        input: args.input_icon,
        output: args.output_icon,
    };
    Ok((job, settings))
}

fn target_job(args: TargetArgs, env: &ProcessEnv) -> Result<(Job, RunSettings)> {
    if !args.restore_original && args.options.text.is_empty() {
        return Err(Error::Usage(
            "missing expected argument '--text <text>' (required unless --restore-original is set)"
                .into(),
        ));
    }

    let catalog = match (&args.assets_catalog, &env.src_root) {
        (Some(catalog), _) => catalog.clone(),
        (None, Some(src_root)) => find_catalog(src_root, &args.app_icon)?,
        (None, None) => {
            return Err(Error::Usage(
                "missing SRCROOT; run from an Xcode build phase or pass --assets-catalog".into(),
            ));
        }
    };

    let paths = IconSetPaths::in_catalog(&catalog, &args.app_icon, &args.app_icon_original)?;
    let current = IconSet::open(paths.current)?;
    let original = IconSet::open(paths.original)?;

    // restoring never draws, so it needs neither text nor resources
    let (action, settings) = if args.restore_original {
        let settings = RunSettings {
            verbose: args.options.verbose,
            resources_root: PathBuf::new(),
            font_files: Vec::new(),
        };
        (IconSetAction::Restore, settings)
    } else {
        let style = build_style(&args.options, env)?;
        (IconSetAction::Badge(style), run_settings(&args.options, env)?)
    };

    let job = Job::IconSet {
        action,
        current,
        original,
    };
    Ok((job, settings))
}

fn build_style(options: &StyleOptions, env: &ProcessEnv) -> Result<BadgeStyle> {
    let text = resolve_text(&options.text, options.info_plist.as_deref(), &env.build)?;

    BadgeStyle::new(text)
        .with_text_color(options.text_color)
        .with_font(options.text_font_name.clone())
        .with_mask(options.text_as_mask)
        .with_ribbon(options.ribbon_color, options.ribbon_position)
        .with_vertical_bias(options.text_vertical_bias)
}

fn run_settings(options: &StyleOptions, env: &ProcessEnv) -> Result<RunSettings> {
    let resources_root = options
        .resources_root_path
        .clone()
        .or_else(|| env.pods_root.as_ref().map(|root| root.join(PODS_RESOURCES_DIR)))
        .ok_or_else(|| {
            Error::Usage(
                "missing PODS_ROOT; run from an Xcode build phase or pass --resources-root-path"
                    .into(),
            )
        })?;

    if !resources_root.is_dir() {
        return Err(Error::Usage(format!(
            "resources root {} is not a directory",
            resources_root.display()
        )));
    }

    Ok(RunSettings {
        verbose: options.verbose,
        resources_root,
        font_files: options.font_files.clone(),
    })
}
