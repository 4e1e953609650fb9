use std::fmt::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use comfy_table::{Cell, Color as TableColor};

use crate::hierarchy::{Pipeline, TreeStats};

use super::styling::{bright, bright_green, bright_yellow, cyan, dim};
use super::tables::{color_coded_success_cell, count_cell, create_table, cyan_header};

const MAX_PIPELINE_ROWS: usize = 10;

/// Prints a human-readable summary of a converted tree to stdout.
///
/// Displays:
/// - Overview: source file, pipeline/workflow/job counts, conversion time
/// - Pipelines: the first ten pipelines in input order with workflow success
///   rate and summed credits
pub fn print_summary(pipelines: &[Pipeline], source: &Path) {
    println!(
        "{}",
        render_summary(pipelines, &source.display().to_string(), Utc::now())
    );
}

/// Prints the final conversion totals to stderr.
pub fn print_totals(stats: TreeStats, destination: Option<&Path>) {
    eprint!("{}", render_totals(stats, destination));
}

fn add_section_header(output: &mut String, emoji: &str, title: &str) {
    let _ = writeln!(output, "{} {}", bright(emoji), bright(title).underlined());
}

#[allow(clippy::cast_precision_loss)]
fn workflow_success_rate(pipeline: &Pipeline) -> Option<f64> {
    if pipeline.workflows.is_empty() {
        return None;
    }
    let successful = pipeline.workflows.iter().filter(|w| w.is_successful()).count();
    Some(successful as f64 / pipeline.workflows.len() as f64 * 100.0)
}

fn render_summary(pipelines: &[Pipeline], source: &str, converted_at: DateTime<Utc>) -> String {
    let mut output = String::new();
    let stats = TreeStats::from_pipelines(pipelines);

    add_section_header(&mut output, "📊", "Overview");
    let _ = write!(
        output,
        "  {} {}\n  {} {}\n  {} {}\n  {} {}\n  {} {}\n\n",
        dim("Source:"),
        cyan(source),
        dim("Pipelines:"),
        bright_yellow(stats.pipelines),
        dim("Workflows:"),
        bright_yellow(stats.workflows),
        dim("Jobs:"),
        bright_yellow(stats.jobs),
        dim("Converted at:"),
        dim(converted_at.format("%Y-%m-%d %H:%M UTC"))
    );

    if pipelines.is_empty() {
        let _ = writeln!(output, "{}", bright_yellow("No pipeline data found."));
        return output;
    }

    add_section_header(&mut output, "📋", "Pipelines");

    let mut table = create_table();
    table.set_header(cyan_header(&[
        "Pipeline",
        "Project",
        "Branch",
        "Trigger",
        "Workflows",
        "Success",
        "Jobs",
        "Credits",
    ]));

    for pipeline in pipelines.iter().take(MAX_PIPELINE_ROWS) {
        table.add_row(vec![
            Cell::new(format!(
                "#{}\n{}",
                pipeline.pipeline_number, pipeline.pipeline_id
            )),
            Cell::new(&pipeline.project_name),
            Cell::new(&pipeline.vcs_branch),
            Cell::new(&pipeline.pipeline_trigger_source),
            count_cell(pipeline.workflows.len()),
            color_coded_success_cell(workflow_success_rate(pipeline)),
            count_cell(pipeline.job_count()),
            Cell::new(format!("{:.2}", pipeline.total_credits())),
        ]);
    }

    if pipelines.len() > MAX_PIPELINE_ROWS {
        let mut row = vec![Cell::new(format!(
            "... and {} more",
            pipelines.len() - MAX_PIPELINE_ROWS
        ))
        .fg(TableColor::DarkGrey)];
        row.extend(vec![Cell::new(""); 7]);
        table.add_row(row);
    }

    let _ = writeln!(output, "{table}");
    output
}

fn render_totals(stats: TreeStats, destination: Option<&Path>) -> String {
    let saved_to = destination.map_or_else(|| "stdout".to_string(), |p| p.display().to_string());

    format!(
        "{}\n  {} {}\n  {} {}\n  {} {}\n  {} {}\n",
        bright_green("✓ Converted usage export to a pipeline tree"),
        dim("Total pipelines:"),
        bright_yellow(stats.pipelines),
        dim("Total workflows:"),
        bright_yellow(stats.workflows),
        dim("Total jobs:"),
        bright_yellow(stats.jobs),
        dim("Saved to:"),
        cyan(saved_to)
    )
}
