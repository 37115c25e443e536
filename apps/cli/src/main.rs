use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::fs;
use tracing_subscriber::EnvFilter;

use coursepack_core::{
    AlignOptions, AlignmentMethod, CreateOptions, ExportOptions, HttpApiClient, ImportOptions,
    LearningMode, PackageConfig, PackageFormat, PackageManager, ProficiencyLevel, align,
};

/// CLI wrapper for PackageFormat (needed for clap ValueEnum)
#[derive(Clone, Copy, Default, ValueEnum)]
enum CliFormat {
    #[default]
    Json,
    Binary,
}

impl From<CliFormat> for PackageFormat {
    fn from(cli: CliFormat) -> Self {
        match cli {
            CliFormat::Json => PackageFormat::Json,
            CliFormat::Binary => PackageFormat::Binary,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum CliLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl From<CliLevel> for ProficiencyLevel {
    fn from(cli: CliLevel) -> Self {
        match cli {
            CliLevel::Beginner => ProficiencyLevel::Beginner,
            CliLevel::Intermediate => ProficiencyLevel::Intermediate,
            CliLevel::Advanced => ProficiencyLevel::Advanced,
        }
    }
}

#[derive(Clone, Copy, Default, ValueEnum)]
enum CliMethod {
    RuleBased,
    Statistical,
    #[default]
    Hybrid,
}

impl From<CliMethod> for AlignmentMethod {
    fn from(cli: CliMethod) -> Self {
        match cli {
            CliMethod::RuleBased => AlignmentMethod::RuleBased,
            CliMethod::Statistical => AlignmentMethod::Statistical,
            CliMethod::Hybrid => AlignmentMethod::Hybrid,
        }
    }
}

#[derive(Parser)]
#[command(name = "coursepack")]
#[command(about = "Import, export, transform, and adapt bilingual course packages")]
struct Cli {
    /// Backend API base URL
    #[arg(long, default_value = "http://localhost:3000", global = true)]
    api_url: String,

    /// Bearer token; falls back to COURSEPACK_TOKEN
    #[arg(long, global = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Import a package artifact (JSON document or gzip archive)
    Import {
        file: PathBuf,
        /// Declared media type; sniffed from the bytes when omitted
        #[arg(long)]
        media_type: Option<String>,
    },
    /// Export the package containing a course
    Export {
        course_id: String,
        #[arg(short, long, default_value = "json")]
        format: CliFormat,
        /// Output path; defaults to ./<course-id>.{json,tar.gz}
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Create a course from a material-analysis result
    Create {
        material_id: String,
        #[arg(long)]
        title: Option<String>,
    },
    /// Adapt a course to a difficulty tier
    Adapt {
        course_id: String,
        #[arg(short, long)]
        level: CliLevel,
    },
    /// Project a lesson through a learning mode
    Transform {
        course_id: String,
        lesson_id: String,
        /// Mode name; unrecognized names fall back to 'original'
        #[arg(short, long, default_value = "notes")]
        mode: String,
    },
    /// Align two parallel text files into sentence pairs (offline)
    Align {
        source_file: PathBuf,
        target_file: PathBuf,
        #[arg(short, long, default_value = "hybrid")]
        method: CliMethod,
    },
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn ok(msg: impl std::fmt::Display) {
    println!("{} {}", style("✓").green().bold(), msg);
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let token = cli
        .token
        .clone()
        .or_else(|| std::env::var("COURSEPACK_TOKEN").ok());
    let api = Arc::new(HttpApiClient::new(cli.api_url.clone(), token));
    let manager = PackageManager::new(api, PackageConfig::default());

    match cli.command {
        Command::Import { file, media_type } => {
            let bytes = fs::read(&file).await?;
            let spinner = create_spinner("Importing package...");
            let (result, media) = manager
                .import_package(
                    &bytes,
                    &ImportOptions {
                        declared_media_type: media_type,
                    },
                )
                .await?;
            spinner.finish_and_clear();
            ok(format!(
                "Imported package {}: {} course(s), {} lesson(s), {} block(s), {} pair(s)",
                style(&result.package_id).cyan(),
                result.courses_imported,
                result.lessons_imported,
                result.content_blocks_imported,
                result.sentence_pairs_imported,
            ));
            if !media.is_empty() {
                println!("  bundled media: {} file(s)", media.len());
            }
            for warning in &result.warnings {
                println!("{} {}", style("!").yellow().bold(), warning);
            }
        }
        Command::Export { course_id, format, out } => {
            let format: PackageFormat = format.into();
            let spinner = create_spinner("Exporting package...");
            let (result, bytes) = manager
                .export_package(&course_id, &ExportOptions::new(format))
                .await?;
            spinner.finish_and_clear();

            let out = out.unwrap_or_else(|| {
                let ext = match format {
                    PackageFormat::Json => "json",
                    PackageFormat::Binary => "tar.gz",
                };
                dirs::download_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(format!("{course_id}.{ext}"))
            });
            fs::write(&out, &bytes).await?;
            ok(format!(
                "Exported {} ({} bytes, format {}) to {}",
                style(&result.package_id).cyan(),
                result.file_size_bytes,
                result.format,
                style(out.display()).dim(),
            ));
            if let Some(url) = &result.download_url {
                println!("  download: {}", style(url).dim());
            }
        }
        Command::Create { material_id, title } => {
            let spinner = create_spinner("Creating course from material...");
            let course_id = manager
                .create_from_material(
                    &material_id,
                    &CreateOptions {
                        title,
                        ..CreateOptions::default()
                    },
                )
                .await?;
            spinner.finish_and_clear();
            ok(format!("Created course {}", style(course_id).cyan()));
        }
        Command::Adapt { course_id, level } => {
            let level: ProficiencyLevel = level.into();
            let spinner = create_spinner(&format!("Adapting course to {level}..."));
            let (new_course_id, report) = manager.adapt_course(&course_id, level).await?;
            spinner.finish_and_clear();
            ok(format!(
                "Adapted {} -> {} ({} block(s) enriched)",
                style(&course_id).dim(),
                style(&new_course_id).cyan(),
                report.blocks_adapted,
            ));
            for failure in &report.blocks_failed {
                println!(
                    "{} block {} carried over unadapted: {}",
                    style("!").yellow().bold(),
                    failure.block_id,
                    failure.reason
                );
            }
        }
        Command::Transform { course_id, lesson_id, mode } => {
            let mode = LearningMode::parse_or_original(&mode);
            let spinner = create_spinner(&format!("Transforming lesson for {mode}..."));
            let content = manager.transform_lesson(&course_id, &lesson_id, mode).await?;
            spinner.finish_and_clear();
            ok(format!(
                "{}: {} item(s)",
                style(&content.title).cyan(),
                content.content_items.len()
            ));
            println!("{}", serde_json::to_string_pretty(&content)?);
        }
        Command::Align { source_file, target_file, method } => {
            let source = fs::read_to_string(&source_file).await?;
            let target = fs::read_to_string(&target_file).await?;
            let pairs = align(
                &source,
                &target,
                &AlignOptions {
                    method: method.into(),
                },
            );
            ok(format!("Aligned {} pair(s)", pairs.len()));
            for pair in &pairs {
                println!(
                    "  [{}] {}  {}",
                    style(format!("{:.2}", pair.confidence.unwrap_or_default())).yellow(),
                    pair.english,
                    style(&pair.chinese).dim(),
                );
            }
        }
    }

    Ok(())
}
