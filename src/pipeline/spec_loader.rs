// Loads hotspot spec files into CursorSpecs.
//
// static/<name>:   "xhot yhot"
// animated/<name>: "xhot yhot frameCount delayMs"

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{BuildError, BuildResult};
use crate::model::scale::BASE_GRID;
use crate::model::spec::{CursorSpec, Hotspot};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SpecKind {
    Static,
    Animated,
}

impl SpecKind {
    fn field_count(self) -> usize {
        match self {
            SpecKind::Static => 2,
            SpecKind::Animated => 4,
        }
    }
}

/// Loads both spec directories. Any malformed file aborts the load.
pub fn load_specs(static_dir: &Path, animated_dir: &Path) -> BuildResult<BTreeMap<String, CursorSpec>> {
    if !static_dir.is_dir() && !animated_dir.is_dir() {
        return Err(BuildError::NoSpecs {
            dir: static_dir.parent().unwrap_or(static_dir).to_path_buf(),
        });
    }

    let mut specs = BTreeMap::new();

    for (dir, kind) in [(static_dir, SpecKind::Static), (animated_dir, SpecKind::Animated)] {
        for path in spec_files(dir)? {
            let spec = parse_spec_file(&path, kind)?;
            let name = spec.name().to_string();
            if specs.contains_key(&name) {
                return Err(BuildError::malformed_spec(
                    &path,
                    format!("cursor '{}' is defined as both static and animated", name),
                ));
            }
            debug!("Loaded {}", spec.info());
            specs.insert(name, spec);
        }
    }

    if specs.is_empty() {
        return Err(BuildError::NoSpecs {
            dir: static_dir.parent().unwrap_or(static_dir).to_path_buf(),
        });
    }

    Ok(specs)
}

fn spec_files(dir: &Path) -> BuildResult<Vec<std::path::PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| std::io::Error::other(e.to_string()))?;
        let path = entry.path();
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        if path.is_file() && !hidden {
            files.push(path.to_path_buf());
        }
    }
    Ok(files)
}

fn parse_spec_file(path: &Path, kind: SpecKind) -> BuildResult<CursorSpec> {
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .ok_or_else(|| BuildError::malformed_spec(path, "missing file name"))?;
    let content = fs::read_to_string(path)?;
    parse_spec(&name, &content, kind).map_err(|reason| BuildError::malformed_spec(path, reason))
}

fn parse_spec(name: &str, content: &str, kind: SpecKind) -> Result<CursorSpec, String> {
    let mut records = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'));

    let record = records.next().ok_or("no spec record")?;
    if records.next().is_some() {
        return Err("more than one spec record".to_string());
    }

    let fields: Vec<&str> = record.split_whitespace().collect();
    if fields.len() != kind.field_count() {
        return Err(format!(
            "expected {} fields, found {} in '{}'",
            kind.field_count(),
            fields.len(),
            record
        ));
    }

    let hotspot = Hotspot {
        x: parse_coord(fields[0], "xhot")?,
        y: parse_coord(fields[1], "yhot")?,
    };
    check_hotspot(name, hotspot);

    match kind {
        SpecKind::Static => Ok(CursorSpec::Static {
            name: name.to_string(),
            hotspot,
        }),
        SpecKind::Animated => {
            let frame_count: u32 = fields[2]
                .parse()
                .map_err(|_| format!("frameCount '{}' is not a whole number", fields[2]))?;
            if frame_count == 0 {
                return Err("frameCount must be at least 1".to_string());
            }
            let frame_delay_ms: u32 = fields[3]
                .parse()
                .map_err(|_| format!("delayMs '{}' is not a whole number", fields[3]))?;

            Ok(CursorSpec::Animated {
                name: name.to_string(),
                hotspot,
                frame_count,
                frame_delay_ms,
            })
        }
    }
}

fn parse_coord(field: &str, label: &str) -> Result<f64, String> {
    match field.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(format!("{} '{}' is not a number", label, field)),
    }
}

fn check_hotspot(name: &str, hotspot: Hotspot) {
    let grid = BASE_GRID as f64;
    if !(0.0..=grid).contains(&hotspot.x) || !(0.0..=grid).contains(&hotspot.y) {
        warn!(
            "Hotspot {},{} of '{}' lies outside the {}x{} grid",
            hotspot.x, hotspot.y, name, BASE_GRID, BASE_GRID
        );
    }
}
