use std::io::Write;

use crate::config::OutputFormat;
use crate::error::Result;
use crate::hierarchy::Pipeline;

/// Writes the pipeline tree as a structured document.
///
/// Supports:
/// - JSON: indented or compact
/// - YAML: always block style
pub fn export_tree(
    pipelines: &[Pipeline],
    format: OutputFormat,
    pretty: bool,
    output: &mut dyn Write,
) -> Result<()> {
    match format {
        OutputFormat::Summary => {
            // Summary format is rendered by output::summary
            unreachable!("Summary format should be handled in CLI")
        }
        OutputFormat::Json => export_json(pipelines, pretty, output),
        OutputFormat::Yaml => export_yaml(pipelines, output),
    }
}

fn export_json(pipelines: &[Pipeline], pretty: bool, output: &mut dyn Write) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *output, pipelines)?;
    } else {
        serde_json::to_writer(&mut *output, pipelines)?;
    }
    writeln!(output)?;
    Ok(())
}

fn export_yaml(pipelines: &[Pipeline], output: &mut dyn Write) -> Result<()> {
    serde_yaml::to_writer(&mut *output, pipelines)?;
    Ok(())
}
