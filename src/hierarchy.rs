use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::reader::Row;

/// A CI pipeline with the workflows it ran, in first-seen order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipeline {
    pub pipeline_id: String,
    pub pipeline_number: String,
    pub pipeline_created_at: String,
    pub organization_id: String,
    pub organization_name: String,
    pub project_id: String,
    pub project_name: String,
    pub vcs_name: String,
    pub vcs_url: String,
    pub vcs_branch: String,
    pub pipeline_trigger_source: String,
    pub pipeline_trigger_user_id: String,
    pub is_unregistered_user: String,
    pub workflows: Vec<Workflow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    pub workflow_id: String,
    pub workflow_name: String,
    pub workflow_first_job_queued_at: String,
    pub workflow_first_job_started_at: String,
    pub workflow_stopped_at: String,
    pub is_workflow_successful: String,
    pub jobs: Vec<Job>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub job_id: String,
    pub job_name: String,
    pub job_run_number: String,
    pub job_run_date: String,
    pub job_run_queued_at: String,
    pub job_run_started_at: String,
    pub job_run_stopped_at: String,
    pub job_build_status: String,
    pub resource_class: String,
    pub operating_system: String,
    pub executor: String,
    pub parallelism: String,
    pub job_run_seconds: String,
    pub median_cpu_utilization_pct: String,
    pub max_cpu_utilization_pct: String,
    pub median_ram_utilization_pct: String,
    pub max_ram_utilization_pct: String,
    pub credits: Credits,
}

/// Credit consumption of one job run, kept as exported text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credits {
    pub compute_credits: String,
    pub dlc_credits: String,
    pub user_credits: String,
    pub storage_credits: String,
    pub network_credits: String,
    pub lease_credits: String,
    pub lease_overage_credits: String,
    pub ipranges_credits: String,
    pub total_credits: String,
}

impl Pipeline {
    /// Pipeline attributes of `row`, with no workflows attached yet.
    pub fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            pipeline_id: row.take("PIPELINE_ID")?,
            pipeline_number: row.take("PIPELINE_NUMBER")?,
            pipeline_created_at: row.take("PIPELINE_CREATED_AT")?,
            organization_id: row.take("ORGANIZATION_ID")?,
            organization_name: row.take("ORGANIZATION_NAME")?,
            project_id: row.take("PROJECT_ID")?,
            project_name: row.take("PROJECT_NAME")?,
            vcs_name: row.take("VCS_NAME")?,
            vcs_url: row.take("VCS_URL")?,
            vcs_branch: row.take("VCS_BRANCH")?,
            pipeline_trigger_source: row.take("PIPELINE_TRIGGER_SOURCE")?,
            pipeline_trigger_user_id: row.take("PIPELINE_TRIGGER_USER_ID")?,
            is_unregistered_user: row.take("IS_UNREGISTERED_USER")?,
            workflows: Vec::new(),
        })
    }

    pub fn job_count(&self) -> usize {
        self.workflows.iter().map(|w| w.jobs.len()).sum()
    }

    /// Sum of `total_credits` over all jobs. Values that do not parse count as zero.
    pub fn total_credits(&self) -> f64 {
        self.workflows
            .iter()
            .flat_map(|w| &w.jobs)
            .map(|job| job.credits.total_credits.trim().parse::<f64>().unwrap_or(0.0))
            .sum()
    }
}

impl Workflow {
    /// Workflow attributes of `row`, with no jobs attached yet.
    pub fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            workflow_id: row.take("WORKFLOW_ID")?,
            workflow_name: row.take("WORKFLOW_NAME")?,
            workflow_first_job_queued_at: row.take("WORKFLOW_FIRST_JOB_QUEUED_AT")?,
            workflow_first_job_started_at: row.take("WORKFLOW_FIRST_JOB_STARTED_AT")?,
            workflow_stopped_at: row.take("WORKFLOW_STOPPED_AT")?,
            is_workflow_successful: row.take("IS_WORKFLOW_SUCCESSFUL")?,
            jobs: Vec::new(),
        })
    }

    pub fn is_successful(&self) -> bool {
        self.is_workflow_successful.trim().eq_ignore_ascii_case("true")
    }
}

impl Job {
    pub fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            job_id: row.take("JOB_ID")?,
            job_name: row.take("JOB_NAME")?,
            job_run_number: row.take("JOB_RUN_NUMBER")?,
            job_run_date: row.take("JOB_RUN_DATE")?,
            job_run_queued_at: row.take("JOB_RUN_QUEUED_AT")?,
            job_run_started_at: row.take("JOB_RUN_STARTED_AT")?,
            job_run_stopped_at: row.take("JOB_RUN_STOPPED_AT")?,
            job_build_status: row.take("JOB_BUILD_STATUS")?,
            resource_class: row.take("RESOURCE_CLASS")?,
            operating_system: row.take("OPERATING_SYSTEM")?,
            executor: row.take("EXECUTOR")?,
            parallelism: row.take("PARALLELISM")?,
            job_run_seconds: row.take("JOB_RUN_SECONDS")?,
            median_cpu_utilization_pct: row.take("MEDIAN_CPU_UTILIZATION_PCT")?,
            max_cpu_utilization_pct: row.take("MAX_CPU_UTILIZATION_PCT")?,
            median_ram_utilization_pct: row.take("MEDIAN_RAM_UTILIZATION_PCT")?,
            max_ram_utilization_pct: row.take("MAX_RAM_UTILIZATION_PCT")?,
            credits: Credits::from_row(row)?,
        })
    }
}

impl Credits {
    pub fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            compute_credits: row.take("COMPUTE_CREDITS")?,
            dlc_credits: row.take("DLC_CREDITS")?,
            user_credits: row.take("USER_CREDITS")?,
            storage_credits: row.take("STORAGE_CREDITS")?,
            network_credits: row.take("NETWORK_CREDITS")?,
            lease_credits: row.take("LEASE_CREDITS")?,
            lease_overage_credits: row.take("LEASE_OVERAGE_CREDITS")?,
            ipranges_credits: row.take("IPRANGES_CREDITS")?,
            total_credits: row.take("TOTAL_CREDITS")?,
        })
    }
}

/// Entry counts at each level of a converted tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeStats {
    pub pipelines: usize,
    pub workflows: usize,
    pub jobs: usize,
}

impl TreeStats {
    pub fn from_pipelines(pipelines: &[Pipeline]) -> Self {
        Self {
            pipelines: pipelines.len(),
            workflows: pipelines.iter().map(|p| p.workflows.len()).sum(),
            jobs: pipelines.iter().map(Pipeline::job_count).sum(),
        }
    }
}
