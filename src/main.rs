// svg2xcur: build cursor themes from SVG artwork
//
//   svg2xcur build  [OPTIONS]   Render, compile and link a complete theme
//   svg2xcur expand [OPTIONS]   Only write the per-cursor config files

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use svg2xcur::config::{BuildConfig, CompilerKind, LoggingConfig, Platform, RasterizerKind, Variant};
use svg2xcur::logging::init_logging;
use svg2xcur::model::scale::DensityTier;
use svg2xcur::pipeline::build::{build, expand_only};

#[derive(Parser)]
#[command(
    name = "svg2xcur",
    about = "Build multi-density cursor themes from SVG artwork",
    version
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a complete theme
    Build(BuildArgs),

    /// Write the per-cursor config files without rendering or compiling
    Expand(BuildArgs),
}

#[derive(Args)]
struct BuildArgs {
    /// Theme source directory (svg/, hotspots/, aliases, theme.toml)
    #[arg(short, long, default_value = ".")]
    source: PathBuf,

    /// Where finished themes are written
    #[arg(short, long, default_value = "dist")]
    output: PathBuf,

    /// Scratch directory for rendered bitmaps and configs
    #[arg(short, long, default_value = "build")]
    build_dir: PathBuf,

    /// Highest density tier to build: lo, tv, hd, xhd, xxhd or xxxhd
    #[arg(short = 'd', long = "max-density", default_value = "xxxhd", value_parser = parse_tier)]
    max_density: DensityTier,

    /// Theme variant
    #[arg(short = 't', long = "type", value_enum, default_value_t = Variant::Dark)]
    variant: Variant,

    /// Target platform
    #[arg(short, long, value_enum, default_value_t = Platform::Unix)]
    platform: Platform,

    /// SVG renderer
    #[arg(long, value_enum, default_value = "resvg")]
    rasterizer: RasterizerKind,

    /// Cursor compiler (unix only; windows always uses the builtin writer)
    #[arg(long, value_enum, default_value = "builtin")]
    compiler: CompilerKind,

    /// Worker threads, 0 for one per core
    #[arg(short = 'j', long, default_value = "0")]
    jobs: usize,
}

fn parse_tier(s: &str) -> Result<DensityTier, svg2xcur::BuildError> {
    s.parse()
}

impl BuildArgs {
    fn into_config(self) -> BuildConfig {
        BuildConfig {
            source_dir: self.source,
            output_dir: self.output,
            build_dir: self.build_dir,
            tier: self.max_density,
            variant: self.variant,
            platform: self.platform,
            rasterizer: self.rasterizer,
            compiler: self.compiler,
            thread_count: self.jobs,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    init_logging(&LoggingConfig {
        level: if cli.verbose { "debug" } else { "info" }.to_string(),
        json: cli.log_json,
    });

    if let Err(e) = run(cli.command) {
        tracing::error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Build(args) => {
            let config = args.into_config();
            let report = build(&config)
                .with_context(|| format!("building theme from {}", config.source_dir.display()))?;
            println!("{}", report.summary());
        }
        Commands::Expand(args) => {
            let config = args.into_config();
            let report = expand_only(&config)
                .with_context(|| format!("expanding specs from {}", config.source_dir.display()))?;
            for path in &report.config_files {
                println!("{}", path.display());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "svg2xcur", "build", "-d", "xhd", "-t", "light", "-p", "windows", "-j", "4",
        ])
        .unwrap();
        let Commands::Build(args) = cli.command else {
            panic!("expected build");
        };
        let config = args.into_config();
        assert_eq!(config.tier, DensityTier::Xhd);
        assert_eq!(config.variant, Variant::Light);
        assert_eq!(config.platform, Platform::Windows);
        assert_eq!(config.thread_count, 4);
    }

    #[test]
    fn test_invalid_enums_rejected() {
        assert!(Cli::try_parse_from(["svg2xcur", "build", "-d", "ultra"]).is_err());
        assert!(Cli::try_parse_from(["svg2xcur", "build", "-t", "blue"]).is_err());
        assert!(Cli::try_parse_from(["svg2xcur", "build", "-p", "macos"]).is_err());
    }
}
