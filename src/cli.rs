use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};

use crate::aggregate::aggregate;
use crate::config::{delimiter_byte, Config, OutputFormat};
use crate::hierarchy::TreeStats;
use crate::output::{export_tree, print_summary, print_totals, PhaseProgress};
use crate::reader::read_rows;

#[derive(Parser)]
#[command(name = "pipetree")]
#[command(author, version, about = "CI/CD usage export to pipeline tree converter", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (defaults to ./pipetree.{toml,json,yaml,yml})
    #[arg(long, global = true, env = "PIPETREE_CONFIG")]
    config: Option<PathBuf>,

    /// Write the document here instead of stdout
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[arg(short, long, global = true, value_enum)]
    format: Option<OutputFormat>,

    /// Disable pretty-printing
    #[arg(long, global = true, default_value_t = false)]
    compact: bool,

    /// Input field delimiter
    #[arg(short, long, global = true)]
    delimiter: Option<char>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a usage export into a pipeline → workflow → job document
    Convert {
        /// Usage export CSV (falls back to `input.path` in config)
        input: Option<PathBuf>,
    },
    /// Write a default config file
    InitConfig {
        #[arg(default_value = "pipetree.toml")]
        path: PathBuf,
    },
}

/// Everything one conversion run needs, after config and flags are merged.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertSettings {
    pub input: PathBuf,
    pub delimiter: u8,
    pub output: Option<PathBuf>,
    pub format: OutputFormat,
    pub pretty: bool,
}

impl Cli {
    fn resolve_settings(&self, config: Config, input: Option<&Path>) -> Result<ConvertSettings> {
        let Some(input) = input.map(Path::to_path_buf).or(config.input.path) else {
            bail!("No input file given; pass one to `convert` or set input.path in the config");
        };

        Ok(ConvertSettings {
            input,
            delimiter: delimiter_byte(self.delimiter.unwrap_or(config.input.delimiter))?,
            output: self.output.clone().or(config.output.path),
            format: self.format.unwrap_or(config.output.format),
            pretty: config.output.pretty && !self.compact,
        })
    }

    fn init_config(path: &Path) -> Result<()> {
        if path.exists() {
            bail!("Refusing to overwrite existing file: {}", path.display());
        }
        Config::default().save(path)?;
        info!("Default config written to: {}", path.display());
        Ok(())
    }

    pub fn execute(&self) -> Result<()> {
        match &self.command {
            Commands::Convert { input } => {
                let config = Config::load(self.config.as_deref())?;
                let settings = self.resolve_settings(config, input.as_deref())?;
                run_convert(&settings)?;
                Ok(())
            }
            Commands::InitConfig { path } => Self::init_config(path),
        }
    }
}

/// Reads the usage export, builds the pipeline tree, and writes it out.
///
/// The document is fully serialized before the output file is created, so a
/// failed run never leaves a partial document behind.
///
/// # Errors
///
/// Returns an error if the input cannot be read, a row lacks a required
/// column, or the document cannot be written.
pub fn run_convert(settings: &ConvertSettings) -> Result<TreeStats> {
    info!("Converting usage export: {}", settings.input.display());

    let progress = PhaseProgress::start_phase_1();
    let rows = read_rows(&settings.input, settings.delimiter)?;

    let progress = progress.finish_phase_1_start_phase_2(rows.len());
    let pipelines = aggregate(&rows)?;
    let stats = TreeStats::from_pipelines(&pipelines);

    let progress = progress.finish_phase_2_start_phase_3(stats.pipelines);

    if settings.format == OutputFormat::Summary {
        if settings.output.is_some() {
            warn!("Summary format prints to stdout; ignoring output path");
        }
        progress.finish_phase_3();
        print_summary(&pipelines, &settings.input);
    } else {
        let mut document = Vec::new();
        export_tree(&pipelines, settings.format, settings.pretty, &mut document)?;

        if let Some(output_path) = &settings.output {
            std::fs::write(output_path, &document)
                .with_context(|| format!("Failed to write output: {}", output_path.display()))?;
            info!("Pipeline tree written to: {}", output_path.display());
        } else {
            std::io::stdout()
                .lock()
                .write_all(&document)
                .context("Failed to write document to stdout")?;
        }

        progress.finish_phase_3();
        print_totals(stats, settings.output.as_deref());
    }

    info!(
        "Total pipelines: {}, workflows: {}, jobs: {}",
        stats.pipelines, stats.workflows, stats.jobs
    );

    Ok(stats)
}
