//! Gantry CLI - build-output-to-manifest resolver
//!
//! Usage: gantry <COMMAND>
//!
//! Commands:
//!   build  Resolve bundler output passes into the entrypoints manifest
//!   dev    Emit the dev-mode manifest pointing at a live dev server

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use gantry::{
    dev_manifest, paths, BuildConfig, EntryRegistry, GantryError, Manifest, ManifestAssembler,
    OutputPass, MANIFEST_REL_PATH,
};

/// Gantry - build-output-to-manifest resolver
#[derive(Parser, Debug)]
#[command(name = "gantry")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve bundler output passes into the entrypoints manifest
    Build {
        /// Path to the build configuration
        #[arg(short, long, default_value = "gantry.toml")]
        config: PathBuf,

        /// Output pass file (JSON), one per declared output target
        #[arg(short, long = "pass", required = true)]
        passes: Vec<PathBuf>,
    },

    /// Emit the dev-mode manifest pointing at a live dev server
    Dev {
        /// Path to the build configuration
        #[arg(short, long, default_value = "gantry.toml")]
        config: PathBuf,

        /// Dev server origin, e.g. http://127.0.0.1:5173
        #[arg(short, long)]
        origin: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { config, passes } => cmd_build(&config, &passes),
        Commands::Dev { config, origin } => cmd_dev(&config, &origin),
    }
}

fn cmd_build(config_path: &Path, pass_files: &[PathBuf]) -> Result<()> {
    let config = BuildConfig::load(config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    let registry = EntryRegistry::from_config(&config);

    let mut assembler = ManifestAssembler::new(&config, pass_files.len());
    for pass_file in pass_files {
        let text = fs::read_to_string(pass_file)
            .with_context(|| format!("reading {}", pass_file.display()))?;
        let pass: OutputPass = serde_json::from_str(&text)
            .with_context(|| format!("parsing {}", pass_file.display()))?;
        assembler.ingest_pass(&pass);
        println!(
            "✓ Ingested {} ({} units)",
            pass_file.display(),
            pass.units.len()
        );
    }

    let manifest = assembler.assemble(&registry, &config.external)?;
    let manifest_path = write_manifest(&config, &manifest)?;

    println!(
        "✓ Resolved {} entry points across {} pass(es)",
        manifest.entry_points.len(),
        pass_files.len()
    );
    println!("✓ Wrote {}", manifest_path.display());
    Ok(())
}

fn cmd_dev(config_path: &Path, origin: &str) -> Result<()> {
    let config = BuildConfig::load(config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    let registry = EntryRegistry::from_config(&config);

    let manifest = dev_manifest(&config, &registry, origin);
    let manifest_path = write_manifest(&config, &manifest)?;

    println!("✓ Dev server origin: {origin}");
    println!("✓ Wrote {}", manifest_path.display());
    Ok(())
}

/// Write the manifest under the build output root, refusing to step outside
/// the project root.
fn write_manifest(config: &BuildConfig, manifest: &Manifest) -> Result<PathBuf> {
    let root = config
        .root
        .canonicalize()
        .with_context(|| format!("resolving project root {}", config.root.display()))?;
    let out_dir = if config.out_dir.is_absolute() {
        config.out_dir.clone()
    } else {
        root.join(&config.out_dir)
    };

    let root_str = root.to_string_lossy();
    let out_str = out_dir.to_string_lossy();
    if !paths::is_subdirectory(&root_str, &out_str) {
        return Err(GantryError::OutsideProjectRoot {
            out_dir: out_dir.clone(),
            root: root.clone(),
        }
        .into());
    }

    let manifest_path = out_dir.join(MANIFEST_REL_PATH);
    if let Some(parent) = manifest_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(manifest)?;
    fs::write(&manifest_path, json)
        .with_context(|| format!("writing {}", manifest_path.display()))?;
    Ok(manifest_path)
}
