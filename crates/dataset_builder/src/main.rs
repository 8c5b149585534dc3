//! Dataset Builder CLI
//!
//! Synthetic dataset generation → handoff CSV
//! Single-child assessment and reference table export

#[cfg(feature = "cli")]
use anyhow::{Context, Result};
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use gizi_core::growth::{GrowthStandardTable, Indicator, TableVariant, WeightForHeightMethod};
#[cfg(feature = "cli")]
use gizi_core::models::resolve_age_months;
#[cfg(feature = "cli")]
use gizi_core::synth::GeneratorProfile;
#[cfg(feature = "cli")]
use gizi_core::{AssessmentOptions, DatasetRequest, Measurement, RuleSet, Sex};
#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "dataset_builder", version)]
#[command(about = "Generate synthetic nutrition datasets and assess children", long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only print errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Generate a synthetic dataset as handoff CSV
    Generate {
        /// Request file (JSON or YAML); overrides the flags below
        #[arg(long)]
        request: Option<PathBuf>,

        /// Generator profile: field_survey | training
        #[arg(long)]
        profile: Option<GeneratorProfile>,

        #[arg(long, default_value = "42")]
        seed: u64,

        /// Number of records requested
        #[arg(long, default_value = "1000")]
        count: i64,

        /// Use the realistic (survey prevalence) preset instead of the balanced one
        #[arg(long, default_value = "false")]
        realistic: bool,

        /// Output CSV file path
        #[arg(long)]
        out: PathBuf,

        /// Add the target_status audit column
        #[arg(long, default_value = "false")]
        with_targets: bool,

        /// Verify checksum after writing
        #[arg(long, default_value = "false")]
        verify: bool,

        /// Output metadata JSON file
        #[arg(long)]
        metadata: Option<PathBuf>,
    },

    /// Assess one measured child
    Assess {
        /// L | P
        #[arg(long)]
        sex: Sex,

        #[arg(long, conflicts_with = "birth_date")]
        age_months: Option<u32>,

        /// YYYY-MM-DD
        #[arg(long)]
        birth_date: Option<chrono::NaiveDate>,

        /// YYYY-MM-DD, defaults to today
        #[arg(long)]
        measured_on: Option<chrono::NaiveDate>,

        #[arg(long)]
        weight_kg: f64,

        #[arg(long)]
        height_cm: f64,

        #[arg(long)]
        arm_cm: Option<f64>,

        /// banded | linear
        #[arg(long)]
        table: Option<TableVariant>,

        /// wasting_priority | composite
        #[arg(long)]
        rule_set: Option<RuleSet>,

        /// Score weight-for-height from height instead of age
        #[arg(long, default_value = "false")]
        height_proportional: bool,
    },

    /// Export a reference table with SD lines as CSV
    Reference {
        /// banded | linear
        #[arg(long)]
        table: Option<TableVariant>,

        /// L | P
        #[arg(long)]
        sex: Option<Sex>,

        /// BB/U | TB/U | BB/TB
        #[arg(long)]
        indicator: Option<Indicator>,

        /// Output CSV file path (stdout if omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[cfg(feature = "cli")]
fn init_tracing(verbose: u8, quiet: bool) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::{EnvFilter, Layer};

    let filter = match verbose {
        0 if quiet => "error",
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter);

    tracing_subscriber::registry().with(stderr_layer).init();
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Generate {
            request,
            profile,
            seed,
            count,
            realistic,
            out,
            with_targets,
            verify,
            metadata,
        } => {
            let request = match request {
                Some(path) => dataset_builder::load_request(&path)?,
                None => DatasetRequest {
                    profile,
                    balanced: !realistic,
                    ..DatasetRequest::new(GeneratorProfile::from_env_or_default(), seed, count)
                },
            };

            println!("🔨 Generating dataset...");
            println!("   Output: {}", out.display());

            let meta = dataset_builder::build_dataset(&request, &out, with_targets)?;

            print_metadata(&meta);

            if verify {
                verify_dataset_integrity(&out, &meta.checksum)?;
            }

            if let Some(metadata_path) = metadata {
                dataset_builder::save_metadata(&metadata_path, &meta)?;
                println!("\n📄 Metadata saved to: {}", metadata_path.display());
            }
        }

        Commands::Assess {
            sex,
            age_months,
            birth_date,
            measured_on,
            weight_kg,
            height_cm,
            arm_cm,
            table,
            rule_set,
            height_proportional,
        } => {
            let age_months = resolve_age_months(age_months, birth_date, measured_on)
                .context("either --age-months or a valid --birth-date is required")?;

            let measurement = Measurement::new(sex, age_months, weight_kg, height_cm, arm_cm)?;
            let table = GrowthStandardTable::new(table.unwrap_or_else(TableVariant::from_env_or_default));
            let mut options = AssessmentOptions::from_env_or_default();
            if let Some(rule_set) = rule_set {
                options.rule_set = rule_set;
            }
            if height_proportional {
                options.weight_for_height = WeightForHeightMethod::HeightProportional;
            }

            let assessment = gizi_core::assess(&measurement, &table, options)?;
            println!("{}", serde_json::to_string_pretty(&assessment)?);
        }

        Commands::Reference { table, sex, indicator, out } => {
            let variant = table.unwrap_or_else(TableVariant::from_env_or_default);
            let table = GrowthStandardTable::new(variant);
            match out {
                Some(path) => {
                    let file = std::fs::File::create(&path)?;
                    let rows = dataset_builder::write_reference_csv(file, &table, sex, indicator)?;
                    println!("📄 {} reference rows ({}) written to: {}", rows, variant, path.display());
                }
                None => {
                    dataset_builder::write_reference_csv(std::io::stdout().lock(), &table, sex, indicator)?;
                }
            }
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn print_metadata(meta: &dataset_builder::DatasetMetadata) {
    println!("\n✅ Dataset built successfully!");
    println!("   Profile:    {}", meta.profile);
    println!("   Seed:       {}", meta.seed);
    println!(
        "   Rows:       {} of {} requested ({} lost to rounding)",
        meta.report.generated, meta.report.requested_total, meta.report.truncated
    );
    for (status, count) in &meta.quality.status_counts {
        println!("     {:<12} {}", status.label(), count);
    }
    println!(
        "   Mismatches: {} ({:.1}%)",
        meta.quality.mismatches,
        meta.quality.mismatch_rate * 100.0
    );
    println!("   Size:       {} bytes ({:.2} KB)", meta.size_bytes, meta.size_bytes as f64 / 1024.0);
    println!("   Checksum:   {}", meta.checksum);
    println!("   Created:    {}", meta.created_at);
}

#[cfg(feature = "cli")]
fn verify_dataset_integrity(path: &Path, checksum: &str) -> Result<()> {
    println!("\n🔍 Verifying dataset integrity...");
    let is_valid = dataset_builder::verify_dataset(path, checksum)?;

    if is_valid {
        println!("✅ Dataset verification passed");
        Ok(())
    } else {
        anyhow::bail!("❌ Dataset verification failed - checksum mismatch!")
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("dataset_builder CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
