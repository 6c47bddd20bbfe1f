// Runs a whole theme build: load, expand, render, compile, alias, index.

use rayon::prelude::*;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use tracing::info;

use crate::config::{BuildConfig, Platform};
use crate::error::BuildResult;
use crate::model::mapping::AliasMapping;
use crate::model::spec::CursorSpec;
use crate::model::theme::ThemeManifest;

use super::aliases::{LinkReport, link_aliases};
use super::compiler::{CompileContext, compiler_for};
use super::expander::{CursorConfig, expand_all, write_all_configs};
use super::rasterizer::{rasterizer_for, render_scale, svg_sources};
use super::spec_loader::load_specs;
use super::theme_index::{write_index_theme, write_install_inf};

/// Everything read from the source tree before any output is produced.
pub struct ThemeSources {
    pub manifest: ThemeManifest,
    pub specs: BTreeMap<String, CursorSpec>,
    pub aliases: AliasMapping,
}

impl ThemeSources {
    /// Fails on the first malformed input; nothing has been written yet.
    pub fn load(config: &BuildConfig) -> BuildResult<Self> {
        let manifest = ThemeManifest::load_from_file(config.manifest_path())?;
        let specs = load_specs(&config.static_spec_dir(), &config.animated_spec_dir())?;
        let aliases = AliasMapping::load_from_file(config.aliases_path())?;

        info!(
            "Loaded {} cursor specs and {} aliases from {}",
            specs.len(),
            aliases.len(),
            config.source_dir.display()
        );
        Ok(Self {
            manifest,
            specs,
            aliases,
        })
    }

    pub fn theme_name(&self, config: &BuildConfig) -> String {
        let base = self
            .manifest
            .name
            .clone()
            .unwrap_or_else(|| config.default_theme_name());
        format!("{} ({})", base, config.variant.title())
    }
}

#[derive(Debug)]
pub struct ExpandReport {
    pub configs: Vec<CursorConfig>,
    pub config_files: Vec<PathBuf>,
}

#[derive(Debug)]
pub struct BuildReport {
    pub theme_name: String,
    pub theme_dir: PathBuf,
    pub images_rendered: usize,
    pub cursors: Vec<PathBuf>,
    pub links: LinkReport,
    pub index_written: bool,
}

/// Loads sources and writes the per-cursor config files, nothing else.
pub fn expand_only(config: &BuildConfig) -> BuildResult<ExpandReport> {
    let sources = ThemeSources::load(config)?;
    write_configs(config, &sources)
}

fn write_configs(config: &BuildConfig, sources: &ThemeSources) -> BuildResult<ExpandReport> {
    let scales = config.scale_factors();
    let configs = expand_all(&sources.specs, scales);
    let config_files = write_all_configs(&config.config_dir(), &configs)?;

    info!(
        "Wrote {} cursor configs for {} scale factors to {}",
        config_files.len(),
        scales.len(),
        config.config_dir().display()
    );
    Ok(ExpandReport {
        configs,
        config_files,
    })
}

pub fn build(config: &BuildConfig) -> BuildResult<BuildReport> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.thread_count)
        .build()?;

    pool.install(|| run_build(config))
}

fn run_build(config: &BuildConfig) -> BuildResult<BuildReport> {
    let sources = ThemeSources::load(config)?;
    let svgs = svg_sources(&config.svg_dir())?;
    let theme_name = sources.theme_name(config);
    info!(
        "Building '{}' for {} at {} ({} scale factors)",
        theme_name,
        config.platform,
        config.tier,
        config.scale_factors().len()
    );

    let expanded = write_configs(config, &sources)?;

    let rasterizer = rasterizer_for(config.rasterizer);
    let image_root = config.image_root();
    let mut images_rendered = 0;
    for &scale in config.scale_factors() {
        images_rendered += render_scale(rasterizer.as_ref(), &svgs, &image_root, scale)?;
    }

    let cursors_dir = config.cursors_dir();
    fs::create_dir_all(&cursors_dir)?;

    let compiler = compiler_for(config.platform, config.compiler);
    let config_dir = config.config_dir();
    let ctx = CompileContext {
        image_root: &image_root,
        config_dir: &config_dir,
        output_dir: &cursors_dir,
    };
    info!("Compiling {} cursors with {}", expanded.configs.len(), compiler.name());
    let cursors = expanded
        .configs
        .par_iter()
        .map(|cursor| compiler.compile(cursor, &ctx))
        .collect::<BuildResult<Vec<PathBuf>>>()?;

    let theme_dir = config.theme_dir();
    let (links, index_written) = match config.platform {
        Platform::Unix => {
            let links = link_aliases(&cursors_dir, &sources.aliases)?;
            info!(
                "Linked {} aliases ({} already present, {} without target)",
                links.created, links.existing, links.missing_target
            );
            let written = write_index_theme(&theme_dir, &theme_name, &sources.manifest)?;
            (links, written)
        }
        Platform::Windows => {
            let built: BTreeMap<String, String> = expanded
                .configs
                .iter()
                .map(|cursor| (cursor.name.clone(), compiler.output_name(cursor)))
                .collect();
            let written =
                write_install_inf(&theme_dir, &theme_name, &sources.manifest, &sources.aliases, &built)?;
            (LinkReport::default(), written)
        }
    };
    if !index_written {
        info!("Kept existing theme descriptor in {}", theme_dir.display());
    }

    Ok(BuildReport {
        theme_name,
        theme_dir,
        images_rendered,
        cursors,
        links,
        index_written,
    })
}

impl BuildReport {
    pub fn summary(&self) -> String {
        format!(
            "{}: {} cursors, {} images, {} aliases -> {}",
            self.theme_name,
            self.cursors.len(),
            self.images_rendered,
            self.links.created,
            self.theme_dir.display()
        )
    }
}
