//! LabPBR to Bedrock RTX texture converter CLI

use clap::{Parser, Subcommand};
use labpbr_core::{
    discover_texture_sets, pack_mer_files, ConversionReport, ConversionStats, ConverterConfig,
    PbrConverter, TextureMappings, METAL_DEFINITIONS,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// JSON output of `detect --json`
#[derive(Debug, Serialize)]
struct DetectedSet {
    name: String,
    roles: Vec<String>,
    sources: Vec<String>,
}

#[derive(Parser)]
#[command(name = "labpbr")]
#[command(about = "Convert LabPBR (Java) texture sets to Bedrock RTX texture sets.")]
#[command(version = concat!("v", env!("CARGO_PKG_VERSION")))]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log per-file progress (or set RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert every PBR texture set under a directory
    Convert {
        /// Java textures directory (searched recursively)
        input: PathBuf,
        /// Bedrock textures output root
        #[arg(short, long)]
        output: PathBuf,
        /// Texture name mapping file (JSON)
        #[arg(long)]
        mappings: Option<PathBuf>,
        /// Config file (TOML)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Descriptor namespace (overrides config)
        #[arg(long)]
        namespace: Option<String>,
        /// Output image extension: png, tga, or jpg (overrides config)
        #[arg(long)]
        extension: Option<String>,
        /// Convert one texture set at a time
        #[arg(long)]
        sequential: bool,
        /// Write the conversion report as JSON to this file
        #[arg(long)]
        report: Option<PathBuf>,
        /// Print the conversion report as JSON
        #[arg(long)]
        json: bool,
        /// Exit non-zero if any texture failed to convert
        #[arg(long)]
        strict: bool,
    },
    /// List detected PBR texture sets without converting
    Detect {
        /// Java textures directory (searched recursively)
        input: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Pack separate metalness, emissive, and roughness maps into a MER map
    PackMer {
        #[arg(long)]
        metallic: Option<PathBuf>,
        #[arg(long)]
        emissive: Option<PathBuf>,
        #[arg(long)]
        roughness: Option<PathBuf>,
        /// Output MER image path
        #[arg(short, long)]
        output: PathBuf,
    },
    /// List predefined LabPBR metal IDs
    Metals {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let fmt_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Convert {
            input,
            output,
            mappings,
            config,
            namespace,
            extension,
            sequential,
            report,
            json,
            strict,
        } => {
            let config = build_config(config.as_deref(), namespace, extension, sequential)?;
            let stats = cmd_convert(
                &input,
                &output,
                mappings.as_deref(),
                config,
                report.as_deref(),
                json,
            )?;
            if strict && stats.has_errors() {
                return Err(format!("{} texture(s) failed to convert", stats.errors).into());
            }
            Ok(())
        }
        Commands::Detect { input, json } => cmd_detect(&input, json),
        Commands::PackMer {
            metallic,
            emissive,
            roughness,
            output,
        } => cmd_pack_mer(
            metallic.as_deref(),
            emissive.as_deref(),
            roughness.as_deref(),
            &output,
        ),
        Commands::Metals { json } => cmd_metals(json),
    }
}

fn build_config(
    path: Option<&Path>,
    namespace: Option<String>,
    extension: Option<String>,
    sequential: bool,
) -> Result<ConverterConfig, Box<dyn std::error::Error>> {
    let mut config = match path {
        Some(p) => ConverterConfig::load(p)?,
        None => ConverterConfig::default(),
    };
    if let Some(ns) = namespace {
        config.namespace = ns;
    }
    if let Some(ext) = extension {
        config.output_extension = ext.trim_start_matches('.').to_lowercase();
    }
    if sequential {
        config.parallel = false;
    }
    config.validate()?;
    Ok(config)
}

fn cmd_convert(
    input: &Path,
    output: &Path,
    mappings: Option<&Path>,
    config: ConverterConfig,
    report_path: Option<&Path>,
    json: bool,
) -> Result<ConversionStats, Box<dyn std::error::Error>> {
    let mappings = mappings.map(TextureMappings::load).transpose()?;
    if let Some(m) = &mappings {
        tracing::info!("Loaded {} texture mappings", m.len());
    }

    let converter = PbrConverter::new(config);
    let stats = converter.convert_pack(input, output, mappings.as_ref());
    let report = ConversionReport::new(stats).with_paths(input, output);

    if let Some(path) = report_path {
        report.write_json(path)?;
        tracing::info!("Wrote conversion report to {}", path.display());
    }

    if json {
        println!("{}", report.to_json()?);
    } else {
        println!("{}", report.to_text());
    }

    if stats.has_errors() {
        tracing::warn!("{} texture(s) could not be converted", stats.errors);
    }
    Ok(stats)
}

fn cmd_detect(input: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let sets = discover_texture_sets(input);

    if json {
        let detected: Vec<DetectedSet> = sets
            .values()
            .map(|set| DetectedSet {
                name: set.name.clone(),
                roles: set.roles().map(|r| r.to_string()).collect(),
                sources: set.sources.values().map(|p| p.display().to_string()).collect(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&detected)?);
        return Ok(());
    }

    if sets.is_empty() {
        println!("No PBR texture sets found under {}", input.display());
        return Ok(());
    }
    for set in sets.values() {
        println!("{}", set.name);
        for (role, path) in &set.sources {
            println!("  {}: {}", role, path.display());
        }
    }
    println!("\n{} texture set(s)", sets.len());
    Ok(())
}

fn cmd_pack_mer(
    metallic: Option<&Path>,
    emissive: Option<&Path>,
    roughness: Option<&Path>,
    output: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    if metallic.is_none() && emissive.is_none() && roughness.is_none() {
        return Err("At least one of --metallic, --emissive, or --roughness is required".into());
    }
    let mer = pack_mer_files(metallic, emissive, roughness, output)?;
    println!(
        "Packed {}x{} MER map to {}",
        mer.width(),
        mer.height(),
        output.display()
    );
    Ok(())
}

fn cmd_metals(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(&METAL_DEFINITIONS)?);
        return Ok(());
    }
    for metal in &METAL_DEFINITIONS {
        println!(
            "{:>3}  {:<10} F0 = ({:.2}, {:.2}, {:.2})",
            metal.id, metal.name, metal.f0[0], metal.f0[1], metal.f0[2]
        );
    }
    Ok(())
}
