use indexmap::map::Entry;
use indexmap::IndexMap;
use log::{debug, info};

use crate::error::Result;
use crate::hierarchy::{Job, Pipeline, Workflow};
use crate::reader::Row;

/// A pipeline whose workflows are still being collected.
struct PipelineEntry {
    pipeline: Pipeline,
    workflows: IndexMap<String, Workflow>,
}

impl PipelineEntry {
    fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline,
            workflows: IndexMap::new(),
        }
    }

    fn into_pipeline(self) -> Pipeline {
        let mut pipeline = self.pipeline;
        pipeline.workflows = self.workflows.into_values().collect();
        pipeline
    }
}

/// Groups flat job rows into pipeline → workflow → job trees.
///
/// Pipelines and workflows are emitted in the order their identifiers first
/// appear; jobs keep input order. Descriptive pipeline and workflow fields come
/// from the first row bearing the identifier, later rows only contribute jobs.
///
/// # Errors
///
/// Returns `MissingField` for the first row lacking a column it needs. No
/// partial tree is returned.
pub fn aggregate(rows: &[Row]) -> Result<Vec<Pipeline>> {
    let mut pipelines: IndexMap<String, PipelineEntry> = IndexMap::new();

    for row in rows {
        let pipeline_id = row.get("PIPELINE_ID")?;
        let workflow_id = row.get("WORKFLOW_ID")?;

        let entry = match pipelines.entry(pipeline_id.to_owned()) {
            Entry::Occupied(occupied) => occupied.into_mut(),
            Entry::Vacant(vacant) => {
                debug!("New pipeline {pipeline_id} at line {}", row.line());
                vacant.insert(PipelineEntry::new(Pipeline::from_row(row)?))
            }
        };

        let workflow = match entry.workflows.entry(workflow_id.to_owned()) {
            Entry::Occupied(occupied) => {
                let workflow = occupied.into_mut();
                if row
                    .get("WORKFLOW_NAME")
                    .is_ok_and(|name| name != workflow.workflow_name)
                {
                    debug!(
                        "Line {}: workflow {workflow_id} keeps name {:?}",
                        row.line(),
                        workflow.workflow_name
                    );
                }
                workflow
            }
            Entry::Vacant(vacant) => vacant.insert(Workflow::from_row(row)?),
        };

        workflow.jobs.push(Job::from_row(row)?);
    }

    info!(
        "Grouped {} rows into {} pipelines",
        rows.len(),
        pipelines.len()
    );

    Ok(pipelines
        .into_values()
        .map(PipelineEntry::into_pipeline)
        .collect())
}
