// Turns expanded cursor configs into platform cursor files.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{CompilerKind, Platform};
use crate::error::BuildResult;

use super::cursor_types::load_images;
use super::expander::CursorConfig;
use super::external::run_tool;
use super::{win_writer, xcursor_writer};

/// Inputs shared by every cursor of a build.
pub struct CompileContext<'a> {
    /// Root the config rows' image paths are relative to.
    pub image_root: &'a Path,
    /// Directory holding the written `<name>.cursor` files.
    pub config_dir: &'a Path,
    pub output_dir: &'a Path,
}

pub trait CursorCompiler: Send + Sync {
    fn name(&self) -> &'static str;

    /// File name the compiled cursor is written under.
    fn output_name(&self, config: &CursorConfig) -> String;

    fn compile(&self, config: &CursorConfig, ctx: &CompileContext<'_>) -> BuildResult<PathBuf>;
}

pub fn compiler_for(platform: Platform, kind: CompilerKind) -> Box<dyn CursorCompiler> {
    match (platform, kind) {
        (Platform::Unix, CompilerKind::Builtin) => Box::new(XcursorCompiler),
        (Platform::Unix, CompilerKind::Xcursorgen) => Box::new(XcursorgenCompiler::default()),
        (Platform::Windows, _) => Box::new(WindowsCompiler),
    }
}

pub struct XcursorCompiler;

impl CursorCompiler for XcursorCompiler {
    fn name(&self) -> &'static str {
        "xcursor"
    }

    fn output_name(&self, config: &CursorConfig) -> String {
        config.name.clone()
    }

    fn compile(&self, config: &CursorConfig, ctx: &CompileContext<'_>) -> BuildResult<PathBuf> {
        let images = load_images(config, ctx.image_root)?;
        let data = xcursor_writer::to_x11(&images)?;

        let path = ctx.output_dir.join(self.output_name(config));
        fs::write(&path, data)?;
        Ok(path)
    }
}

pub struct XcursorgenCompiler {
    pub binary: String,
}

impl Default for XcursorgenCompiler {
    fn default() -> Self {
        Self {
            binary: "xcursorgen".to_string(),
        }
    }
}

impl CursorCompiler for XcursorgenCompiler {
    fn name(&self) -> &'static str {
        "xcursorgen"
    }

    fn output_name(&self, config: &CursorConfig) -> String {
        config.name.clone()
    }

    fn compile(&self, config: &CursorConfig, ctx: &CompileContext<'_>) -> BuildResult<PathBuf> {
        let config_path = super::expander::config_file_path(ctx.config_dir, &config.name);
        let path = ctx.output_dir.join(self.output_name(config));

        run_tool(
            &self.binary,
            [
                OsStr::new("-p"),
                ctx.image_root.as_os_str(),
                config_path.as_os_str(),
                path.as_os_str(),
            ],
        )?;
        Ok(path)
    }
}

pub struct WindowsCompiler;

impl CursorCompiler for WindowsCompiler {
    fn name(&self) -> &'static str {
        "windows"
    }

    fn output_name(&self, config: &CursorConfig) -> String {
        let ext = if config.is_animated() { "ani" } else { "cur" };
        format!("{}.{}", config.name, ext)
    }

    fn compile(&self, config: &CursorConfig, ctx: &CompileContext<'_>) -> BuildResult<PathBuf> {
        let images = load_images(config, ctx.image_root)?;
        let data = if config.is_animated() {
            win_writer::to_ani(&win_writer::group_frames(images))?
        } else {
            win_writer::to_cur(&images)?
        };

        let path = ctx.output_dir.join(self.output_name(config));
        fs::write(&path, data)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::scale::CANONICAL_SCALES;
    use crate::model::spec::{CursorSpec, Hotspot};
    use crate::pipeline::expander::expand;
    use crate::pipeline::rasterizer::write_png;
    use image::{Rgba, RgbaImage};
    use tempfile::tempdir;

    fn render_fake_images(root: &Path, config: &CursorConfig) {
        for line in &config.lines {
            let img = RgbaImage::from_pixel(line.pixel_size, line.pixel_size, Rgba([0, 0, 0, 255]));
            write_png(&img, &root.join(&line.image_path)).unwrap();
        }
    }

    #[test]
    fn test_output_names() {
        let spinner = expand(
            &CursorSpec::Animated {
                name: "wait".to_string(),
                hotspot: Hotspot { x: 1.0, y: 1.0 },
                frame_count: 2,
                frame_delay_ms: 10,
            },
            &CANONICAL_SCALES[..1],
        );
        assert_eq!(WindowsCompiler.output_name(&spinner), "wait.ani");
        assert_eq!(XcursorCompiler.output_name(&spinner), "wait");
        assert_eq!(compiler_for(Platform::Windows, CompilerKind::Xcursorgen).name(), "windows");
    }

    #[test]
    fn test_xcursor_compiler_row_order() {
        let dir = tempdir().unwrap();
        let config = expand(
            &CursorSpec::Animated {
                name: "wait".to_string(),
                hotspot: Hotspot { x: 12.0, y: 12.0 },
                frame_count: 2,
                frame_delay_ms: 70,
            },
            &CANONICAL_SCALES[..2],
        );
        render_fake_images(dir.path(), &config);

        let ctx = CompileContext {
            image_root: dir.path(),
            config_dir: dir.path(),
            output_dir: dir.path(),
        };
        let path = XcursorCompiler.compile(&config, &ctx).unwrap();

        let images = xcursor::parser::parse_xcursor(&fs::read(path).unwrap()).unwrap();
        let sizes: Vec<u32> = images.iter().map(|i| i.size).collect();
        assert_eq!(sizes, [24, 24, 36, 36]);
        assert_eq!((images[2].xhot, images[2].yhot), (18, 18));
        assert!(images.iter().all(|i| i.delay == 70));
    }

    #[test]
    fn test_windows_compiler_static() {
        let dir = tempdir().unwrap();
        let config = expand(
            &CursorSpec::Static {
                name: "left_ptr".to_string(),
                hotspot: Hotspot { x: 4.0, y: 4.0 },
            },
            &CANONICAL_SCALES[..3],
        );
        render_fake_images(dir.path(), &config);

        let ctx = CompileContext {
            image_root: dir.path(),
            config_dir: dir.path(),
            output_dir: dir.path(),
        };
        let path = WindowsCompiler.compile(&config, &ctx).unwrap();
        assert!(path.ends_with("left_ptr.cur"));

        let data = fs::read(path).unwrap();
        assert_eq!(u16::from_le_bytes([data[4], data[5]]), 3);
    }
}
