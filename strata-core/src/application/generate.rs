// strata-core/src/application/generate.rs

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, instrument};

use crate::application::assembler::ProjectAssembler;
use crate::domain::model::Project;
use crate::domain::rules::ModelRules;
use crate::error::StrataError;
use crate::ports::{MetadataSource, ProjectWriter};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GenerateSummary {
    pub source: String,
    pub tables: usize,
    pub views: usize,
    pub explores: usize,
    pub dimensions: usize,
    pub dimension_groups: usize,
    pub measures: usize,
    pub files: Vec<PathBuf>,
}

impl GenerateSummary {
    fn new(source: &str, tables: usize, project: &Project) -> Self {
        let views = project.views.values();
        Self {
            source: source.to_string(),
            tables,
            views: project.views.len(),
            explores: project.explores.len(),
            dimensions: views.clone().map(|v| v.dimensions.len()).sum(),
            dimension_groups: views.clone().map(|v| v.dimension_groups.len()).sum(),
            measures: views.map(|v| v.measures.len()).sum(),
            files: Vec::new(),
        }
    }
}

pub struct GenerateOutcome {
    pub project: Project,
    pub summary: GenerateSummary,
}

/// Reads the datasets, assembles the project and hands it to `writer`.
///
/// Without a writer nothing touches the disk (dry run).
#[instrument(skip_all, fields(source = source.source_name()))]
pub async fn run_generate(
    source: &dyn MetadataSource,
    writer: Option<&dyn ProjectWriter>,
    datasets: &[String],
    rules: &ModelRules,
) -> Result<GenerateOutcome, StrataError> {
    let start = Instant::now();

    let tables = source.fetch_tables(datasets).await?;
    let project = ProjectAssembler::new(rules).assemble(&tables);
    let mut summary = GenerateSummary::new(source.source_name(), tables.len(), &project);

    if let Some(writer) = writer {
        summary.files = writer.write(&project)?;
    }

    info!(
        tables = summary.tables,
        views = summary.views,
        explores = summary.explores,
        files = summary.files.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Generation finished"
    );
    Ok(GenerateOutcome { project, summary })
}
