// Expands cursor specs into the per-size rows a cursor compiler consumes.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::BuildResult;
use crate::model::scale::ScaleFactor;
use crate::model::spec::CursorSpec;

/// File extension of generated config files.
pub const CONFIG_EXT: &str = "cursor";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigLine {
    pub pixel_size: u32,
    pub xhot: u32,
    pub yhot: u32,
    /// Relative to the build's image root, e.g. `x1.5/wait-03.png`.
    pub image_path: String,
    pub delay_ms: Option<u32>,
}

impl ConfigLine {
    /// `pixelSize xhot yhot imagePath [delayMs]`
    pub fn to_row(&self) -> String {
        match self.delay_ms {
            Some(delay) => format!(
                "{} {} {} {} {}",
                self.pixel_size, self.xhot, self.yhot, self.image_path, delay
            ),
            None => format!(
                "{} {} {} {}",
                self.pixel_size, self.xhot, self.yhot, self.image_path
            ),
        }
    }
}

/// Rows for one cursor, ordered by scale factor then frame index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CursorConfig {
    pub name: String,
    pub lines: Vec<ConfigLine>,
}

impl CursorConfig {
    pub fn is_animated(&self) -> bool {
        self.lines.iter().any(|line| line.delay_ms.is_some())
    }

    /// Distinct pixel sizes in first-seen order.
    pub fn sizes(&self) -> Vec<u32> {
        let mut sizes: Vec<u32> = Vec::new();
        for line in &self.lines {
            if !sizes.contains(&line.pixel_size) {
                sizes.push(line.pixel_size);
            }
        }
        sizes
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(&line.to_row());
            out.push('\n');
        }
        out
    }
}

/// Digits used for frame indices: two, or more when the last index needs it.
pub fn frame_index_width(frame_count: u32) -> usize {
    let last = frame_count.saturating_sub(1);
    last.to_string().len().max(2)
}

pub fn frame_image_name(name: &str, frame: u32, width: usize) -> String {
    format!("{}-{:0width$}", name, frame, width = width)
}

/// Rows come out by ascending scale factor, whatever order `scales` is in.
pub fn expand(spec: &CursorSpec, scales: &[ScaleFactor]) -> CursorConfig {
    let hotspot = spec.hotspot();
    let mut lines = Vec::new();

    let mut ordered = scales.to_vec();
    ordered.sort();
    ordered.dedup();

    for scale in ordered {
        let pixel_size = scale.pixel_size();
        let xhot = scale.scale(hotspot.x);
        let yhot = scale.scale(hotspot.y);
        let dir = scale.dir_name();

        match spec {
            CursorSpec::Static { name, .. } => lines.push(ConfigLine {
                pixel_size,
                xhot,
                yhot,
                image_path: format!("{}/{}.png", dir, name),
                delay_ms: None,
            }),
            CursorSpec::Animated {
                name,
                frame_count,
                frame_delay_ms,
                ..
            } => {
                let width = frame_index_width(*frame_count);
                for frame in 0..*frame_count {
                    lines.push(ConfigLine {
                        pixel_size,
                        xhot,
                        yhot,
                        image_path: format!("{}/{}.png", dir, frame_image_name(name, frame, width)),
                        delay_ms: Some(*frame_delay_ms),
                    });
                }
            }
        }
    }

    CursorConfig {
        name: spec.name().to_string(),
        lines,
    }
}

pub fn expand_all(specs: &BTreeMap<String, CursorSpec>, scales: &[ScaleFactor]) -> Vec<CursorConfig> {
    specs.values().map(|spec| expand(spec, scales)).collect()
}

pub fn config_file_path(config_dir: &Path, name: &str) -> PathBuf {
    config_dir.join(format!("{}.{}", name, CONFIG_EXT))
}

/// Truncates and rewrites `<config_dir>/<name>.cursor`.
pub fn write_config_file(config_dir: &Path, config: &CursorConfig) -> BuildResult<PathBuf> {
    fs::create_dir_all(config_dir)?;

    let path = config_file_path(config_dir, &config.name);
    let mut file = fs::File::create(&path)?;
    file.write_all(config.render().as_bytes())?;
    Ok(path)
}

pub fn write_all_configs(config_dir: &Path, configs: &[CursorConfig]) -> BuildResult<Vec<PathBuf>> {
    configs
        .iter()
        .map(|config| write_config_file(config_dir, config))
        .collect()
}
