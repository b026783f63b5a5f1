use clap::{Parser, Subcommand};
use pangaea_core::{Dataset, DatasetExporter, ExportConfig};
use pangaea_frictionless::{inspect_package, FrictionlessExporter};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "pangaea-frictionless")]
#[command(about = "Export PANGAEA datasets as Frictionless tabular data packages", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Export a dataset descriptor to a Frictionless ZIP package
    Export {
        /// Dataset descriptor (JSON)
        #[arg(long)]
        dataset: PathBuf,

        /// Output directory (defaults to output.directory from config)
        #[arg(long, env = "PANGAEA_OUTPUT_DIR")]
        output: Option<PathBuf>,
    },

    /// Inspect a saved Frictionless ZIP package
    Inspect {
        /// Package file to inspect
        #[arg(long)]
        file: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = ExportConfig::load()?;
    init_logging(&config.logging.level);

    match cli.command {
        Commands::Export { dataset, output } => {
            println!("📦 Exporting dataset {}...", dataset.display());

            if let Some(directory) = output {
                config.output.directory = directory;
            }

            let dataset = Dataset::from_json_file(&dataset)?;
            let mut exporter = FrictionlessExporter::from_config(&dataset, &config);

            let saved = exporter.create().is_some() && exporter.save();
            println!("{}", exporter.log().to_json()?);

            if !saved {
                println!("❌ Export failed for dataset {}", dataset.id);
                std::process::exit(1);
            }

            info!("Saved {}", exporter.target_path().display());
            println!("✅ Export complete: {}", exporter.target_path().display());
            Ok(())
        }

        Commands::Inspect { file } => {
            println!("🔍 Inspecting package {}...", file.display());

            let report = inspect_package(&file)?;

            println!("\nPackage Information:");
            println!("  Entries: {}", report.entries.join(", "));
            println!("  Size: {} bytes", report.size_bytes);
            println!("  SHA-256: {}", report.sha256);
            if let Some(package) = &report.package {
                println!("  Name: {}", package.name.as_deref().unwrap_or("-"));
                println!("  DOI: {}", package.id.as_deref().unwrap_or("-"));
                println!("  Title: {}", package.title.as_deref().unwrap_or("-"));
                println!("  Created: {}", package.created.as_deref().unwrap_or("-"));
            }
            println!("\nData:");
            println!("  Columns: {}", report.csv_header.join(", "));
            println!("  Rows: {}", report.row_count);

            if report.is_valid() {
                println!("\n✅ Package is valid!");
            } else {
                println!("\n❌ Package verification failed!");
                for problem in &report.problems {
                    println!("  - {}", problem);
                }
                std::process::exit(1);
            }

            Ok(())
        }
    }
}

fn init_logging(default_level: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    fmt().with_env_filter(env_filter).with_target(false).init();
}
