use clap::ValueEnum;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::model::scale::{DensityTier, ScaleFactor};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum Variant {
    #[default]
    Dark,
    Light,
}

impl Variant {
    pub fn as_str(self) -> &'static str {
        match self {
            Variant::Dark => "dark",
            Variant::Light => "light",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Variant::Dark => "Dark",
            Variant::Light => "Light",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum Platform {
    #[default]
    Unix,
    Windows,
}

impl Platform {
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Unix => "unix",
            Platform::Windows => "windows",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, ValueEnum)]
pub enum RasterizerKind {
    /// In-process rendering with resvg
    #[default]
    Resvg,
    /// Shell out to `inkscape`
    Inkscape,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, ValueEnum)]
pub enum CompilerKind {
    /// In-process Xcursor / .cur / .ani writer
    #[default]
    Builtin,
    /// Shell out to `xcursorgen` (unix only)
    Xcursorgen,
}

/// Everything a build needs. Built once from the command line and passed by
/// reference to every step.
#[derive(Clone, Debug)]
pub struct BuildConfig {
    pub source_dir: PathBuf,
    pub output_dir: PathBuf,
    pub build_dir: PathBuf,
    pub tier: DensityTier,
    pub variant: Variant,
    pub platform: Platform,
    pub rasterizer: RasterizerKind,
    pub compiler: CompilerKind,
    pub thread_count: usize,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("."),
            output_dir: PathBuf::from("./dist"),
            build_dir: PathBuf::from("./build"),
            tier: DensityTier::default(),
            variant: Variant::default(),
            platform: Platform::default(),
            rasterizer: RasterizerKind::default(),
            compiler: CompilerKind::default(),
            thread_count: 0,
        }
    }
}

impl BuildConfig {
    pub fn scale_factors(&self) -> &'static [ScaleFactor] {
        self.tier.scale_factors()
    }

    pub fn svg_dir(&self) -> PathBuf {
        self.source_dir.join("svg").join(self.variant.as_str())
    }

    pub fn static_spec_dir(&self) -> PathBuf {
        self.source_dir.join("hotspots").join("static")
    }

    pub fn animated_spec_dir(&self) -> PathBuf {
        self.source_dir.join("hotspots").join("animated")
    }

    pub fn aliases_path(&self) -> PathBuf {
        self.source_dir.join("aliases")
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.source_dir.join("theme.toml")
    }

    /// Root of the rendered `x<scale>/` bitmap directories.
    pub fn image_root(&self) -> PathBuf {
        self.build_dir.join(self.variant.as_str())
    }

    pub fn config_dir(&self) -> PathBuf {
        self.image_root().join("config")
    }

    pub fn theme_dir(&self) -> PathBuf {
        self.output_dir
            .join(self.platform.as_str())
            .join(self.variant.as_str())
    }

    pub fn cursors_dir(&self) -> PathBuf {
        match self.platform {
            Platform::Unix => self.theme_dir().join("cursors"),
            Platform::Windows => self.theme_dir(),
        }
    }

    /// Fallback theme name when the manifest has none.
    pub fn default_theme_name(&self) -> String {
        dir_display_name(&self.source_dir)
    }
}

fn dir_display_name(dir: &Path) -> String {
    dir.canonicalize()
        .ok()
        .as_deref()
        .and_then(Path::file_name)
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Cursors".to_string())
}

/// Logging configuration.
#[derive(Clone, Debug)]
pub struct LoggingConfig {
    /// Log level filter (e.g. "info", "svg2xcur=debug").
    pub level: String,

    /// Emit structured JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}
