//! CSV fixtures shared by unit tests.

use crate::reader::{parse_rows, Row};

pub const COLUMNS: [&str; 45] = [
    "PIPELINE_ID",
    "PIPELINE_NUMBER",
    "PIPELINE_CREATED_AT",
    "ORGANIZATION_ID",
    "ORGANIZATION_NAME",
    "PROJECT_ID",
    "PROJECT_NAME",
    "VCS_NAME",
    "VCS_URL",
    "VCS_BRANCH",
    "PIPELINE_TRIGGER_SOURCE",
    "PIPELINE_TRIGGER_USER_ID",
    "IS_UNREGISTERED_USER",
    "WORKFLOW_ID",
    "WORKFLOW_NAME",
    "WORKFLOW_FIRST_JOB_QUEUED_AT",
    "WORKFLOW_FIRST_JOB_STARTED_AT",
    "WORKFLOW_STOPPED_AT",
    "IS_WORKFLOW_SUCCESSFUL",
    "JOB_ID",
    "JOB_NAME",
    "JOB_RUN_NUMBER",
    "JOB_RUN_DATE",
    "JOB_RUN_QUEUED_AT",
    "JOB_RUN_STARTED_AT",
    "JOB_RUN_STOPPED_AT",
    "JOB_BUILD_STATUS",
    "RESOURCE_CLASS",
    "OPERATING_SYSTEM",
    "EXECUTOR",
    "PARALLELISM",
    "JOB_RUN_SECONDS",
    "MEDIAN_CPU_UTILIZATION_PCT",
    "MAX_CPU_UTILIZATION_PCT",
    "MEDIAN_RAM_UTILIZATION_PCT",
    "MAX_RAM_UTILIZATION_PCT",
    "COMPUTE_CREDITS",
    "DLC_CREDITS",
    "USER_CREDITS",
    "STORAGE_CREDITS",
    "NETWORK_CREDITS",
    "LEASE_CREDITS",
    "LEASE_OVERAGE_CREDITS",
    "IPRANGES_CREDITS",
    "TOTAL_CREDITS",
];

/// Builds usage-export CSV text. Columns not overridden get their lowercased name as value.
pub struct UsageCsv {
    columns: Vec<&'static str>,
    lines: Vec<String>,
}

impl UsageCsv {
    pub fn new() -> Self {
        Self {
            columns: COLUMNS.to_vec(),
            lines: Vec::new(),
        }
    }

    pub fn without_column(mut self, column: &str) -> Self {
        self.columns.retain(|c| *c != column);
        self
    }

    pub fn row(mut self, overrides: &[(&str, &str)]) -> Self {
        let values: Vec<String> = self
            .columns
            .iter()
            .map(|column| {
                overrides
                    .iter()
                    .find(|(name, _)| name == column)
                    .map_or_else(|| column.to_lowercase(), |(_, value)| (*value).to_string())
            })
            .collect();
        self.lines.push(values.join(","));
        self
    }

    /// Shorthand for a row identified by pipeline, workflow, and job ids.
    pub fn job(self, pipeline_id: &str, workflow_id: &str, job_id: &str) -> Self {
        self.row(&[
            ("PIPELINE_ID", pipeline_id),
            ("WORKFLOW_ID", workflow_id),
            ("JOB_ID", job_id),
        ])
    }

    pub fn build(&self) -> String {
        let mut text = self.columns.join(",");
        text.push('\n');
        for line in &self.lines {
            text.push_str(line);
            text.push('\n');
        }
        text
    }

    pub fn rows(&self) -> Vec<Row> {
        parse_rows(self.build().as_bytes(), b',').unwrap()
    }
}
