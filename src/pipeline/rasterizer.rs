// SVG -> PNG rendering for every scale factor of a build.

use image::{ImageFormat, Rgba, RgbaImage};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::RasterizerKind;
use crate::error::{BuildError, BuildResult};
use crate::model::scale::ScaleFactor;

use super::external::run_tool;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderJob {
    pub source: PathBuf,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub dpi: u32,
}

pub trait Rasterizer: Send + Sync {
    fn name(&self) -> &'static str;

    /// Produces `job.output`. Parent directories already exist.
    fn render(&self, job: &RenderJob) -> BuildResult<()>;
}

pub fn rasterizer_for(kind: RasterizerKind) -> Box<dyn Rasterizer> {
    match kind {
        RasterizerKind::Resvg => Box::new(ResvgRasterizer),
        RasterizerKind::Inkscape => Box::new(InkscapeRasterizer::default()),
    }
}

pub struct ResvgRasterizer;

impl Rasterizer for ResvgRasterizer {
    fn name(&self) -> &'static str {
        "resvg"
    }

    fn render(&self, job: &RenderJob) -> BuildResult<()> {
        let data = fs::read(&job.source)?;
        let options = usvg::Options {
            dpi: job.dpi as f32,
            ..usvg::Options::default()
        };
        let tree = usvg::Tree::from_data(&data, &options)
            .map_err(|e| BuildError::render(&job.source, e.to_string()))?;

        let mut pixmap = tiny_skia::Pixmap::new(job.width, job.height)
            .ok_or_else(|| BuildError::render(&job.source, "zero-sized target"))?;

        let size = tree.size();
        let scale = (job.width as f32 / size.width()).min(job.height as f32 / size.height());
        let dx = (job.width as f32 - size.width() * scale) / 2.0;
        let dy = (job.height as f32 - size.height() * scale) / 2.0;
        let transform = tiny_skia::Transform::from_scale(scale, scale).post_translate(dx, dy);

        resvg::render(&tree, transform, &mut pixmap.as_mut());

        write_png(&pixmap_to_image(&pixmap), &job.output)
    }
}

/// tiny-skia stores premultiplied pixels; PNG wants straight alpha.
fn pixmap_to_image(pixmap: &tiny_skia::Pixmap) -> RgbaImage {
    let mut image = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in image.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    image
}

pub fn write_png(image: &RgbaImage, path: &Path) -> BuildResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    image.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

pub struct InkscapeRasterizer {
    pub binary: String,
}

impl Default for InkscapeRasterizer {
    fn default() -> Self {
        Self {
            binary: "inkscape".to_string(),
        }
    }
}

impl InkscapeRasterizer {
    pub fn args(job: &RenderJob) -> Vec<String> {
        vec![
            "--export-type=png".to_string(),
            format!("--export-filename={}", job.output.display()),
            format!("--export-width={}", job.width),
            format!("--export-height={}", job.height),
            format!("--export-dpi={}", job.dpi),
            job.source.display().to_string(),
        ]
    }
}

impl Rasterizer for InkscapeRasterizer {
    fn name(&self) -> &'static str {
        "inkscape"
    }

    fn render(&self, job: &RenderJob) -> BuildResult<()> {
        run_tool(&self.binary, Self::args(job))
    }
}

/// All `*.svg` files directly inside `svg_dir`, sorted by name.
pub fn svg_sources(svg_dir: &Path) -> BuildResult<Vec<PathBuf>> {
    if !svg_dir.is_dir() {
        return Err(BuildError::render(svg_dir, "source directory does not exist"));
    }

    let mut sources = Vec::new();
    for entry in WalkDir::new(svg_dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| std::io::Error::other(e.to_string()))?;
        let path = entry.path();
        let is_svg = path
            .extension()
            .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case("svg"))
            .unwrap_or(false);
        if path.is_file() && is_svg {
            sources.push(path.to_path_buf());
        }
    }
    Ok(sources)
}

/// One job per source: `<image_root>/x<s>/<stem>.png`.
pub fn plan_scale(sources: &[PathBuf], image_root: &Path, scale: ScaleFactor) -> Vec<RenderJob> {
    let out_dir = image_root.join(scale.dir_name());
    let size = scale.pixel_size();

    sources
        .iter()
        .filter_map(|source| {
            let stem = source.file_stem()?.to_string_lossy().into_owned();
            Some(RenderJob {
                source: source.clone(),
                output: out_dir.join(format!("{}.png", stem)),
                width: size,
                height: size,
                dpi: scale.dpi(),
            })
        })
        .collect()
}

/// Renders every source at one scale factor. The first failure aborts.
pub fn render_scale(
    rasterizer: &dyn Rasterizer,
    sources: &[PathBuf],
    image_root: &Path,
    scale: ScaleFactor,
) -> BuildResult<usize> {
    fs::create_dir_all(image_root.join(scale.dir_name()))?;

    let jobs = plan_scale(sources, image_root, scale);
    info!(
        "Rendering {} images at x{} ({}px) with {}",
        jobs.len(),
        scale,
        scale.pixel_size(),
        rasterizer.name()
    );

    jobs.par_iter().try_for_each(|job| {
        debug!("{} -> {}", job.source.display(), job.output.display());
        rasterizer.render(job)
    })?;

    Ok(jobs.len())
}
