// strata-core/src/application/assembler.rs

use tracing::{info, instrument, warn};

use crate::application::explore_builder::ExploreBuilder;
use crate::application::measures::MeasureSynthesizer;
use crate::application::view_builder::ViewBuilder;
use crate::domain::metadata::TableSet;
use crate::domain::model::{Project, View};
use crate::domain::rules::ModelRules;
use crate::domain::{FieldClassifier, TypeMapper};

/// Turns a table set into a [`Project`] under one rule set.
pub struct ProjectAssembler<'a> {
    rules: &'a ModelRules,
    classifier: FieldClassifier,
    mapper: TypeMapper,
}

impl<'a> ProjectAssembler<'a> {
    pub fn new(rules: &'a ModelRules) -> Self {
        Self {
            rules,
            classifier: FieldClassifier::new(&rules.naming_conventions, &rules.defaults),
            mapper: TypeMapper::new(rules.type_mapping.clone()),
        }
    }

    pub fn classifier(&self) -> &FieldClassifier {
        &self.classifier
    }

    pub fn mapper(&self) -> &TypeMapper {
        &self.mapper
    }

    #[instrument(skip_all, fields(tables = tables.len()))]
    pub fn assemble(&self, tables: &TableSet) -> Project {
        let naming = &self.rules.naming_conventions;
        let views_builder = ViewBuilder::new(
            naming,
            &self.classifier,
            &self.mapper,
            MeasureSynthesizer::new(&self.classifier, &self.mapper, &self.rules.defaults),
        );
        let explore_builder = ExploreBuilder::new(naming, &self.classifier, &self.mapper);

        // Per-table views are independent; the project maps are written once below.
        let views: Vec<View> = tables.iter().map(|t| views_builder.build(t)).collect();

        let mut project = Project::new();
        for view in views {
            if let Some(previous) = project.insert_view(view) {
                warn!(view = %previous.name, "Two tables produce the same view name, keeping the last one");
            }
        }

        // Relationship detection needs every table, so it runs after all views.
        let generated = explore_builder.build_all(tables);
        let custom = self
            .rules
            .custom_explores
            .iter()
            .map(|c| explore_builder.custom_explore(c));

        for explore in generated.into_iter().chain(custom) {
            let wanted = explore.name.clone();
            let stored = project.add_explore(explore);
            if stored != wanted {
                warn!(explore = %wanted, renamed = %stored, "Explore name already taken");
            }
        }

        for (explore, view) in project.dangling_references() {
            warn!(explore = %explore, view = %view, "Explore references a view that was not generated");
        }

        info!(
            views = project.views.len(),
            explores = project.explores.len(),
            "Project assembled"
        );
        project
    }
}
