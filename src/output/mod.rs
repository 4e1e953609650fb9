mod exports;
mod progress;
mod styling;
mod summary;
mod tables;

pub use exports::export_tree;
pub use progress::PhaseProgress;
pub use styling::{dim, magenta_bold};
pub use summary::{print_summary, print_totals};

/// Prints the `pipetree` banner to stderr.
///
/// Displays the tool name, version, and description at the start of execution.
pub fn print_banner() {
    eprintln!(
        r"
{} {}
  {}
",
        magenta_bold("🌳 pipetree"),
        dim(env!("CARGO_PKG_VERSION")),
        dim("CI/CD usage export → pipeline tree")
    );
}
