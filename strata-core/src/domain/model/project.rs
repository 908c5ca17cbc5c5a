// strata-core/src/domain/model/project.rs

use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::model::explore::Explore;
use crate::domain::model::view::View;

/// The assembled model, keyed by name so rendering order is stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Project {
    pub views: BTreeMap<String, View>,
    pub explores: BTreeMap<String, Explore>,
}

impl Project {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the view previously stored under the same name, if any.
    pub fn insert_view(&mut self, view: View) -> Option<View> {
        self.views.insert(view.name.clone(), view)
    }

    /// Stores the explore under a free name (`name`, `name_2`, `name_3`...)
    /// and returns the name it was stored under.
    pub fn add_explore(&mut self, mut explore: Explore) -> String {
        if self.explores.contains_key(&explore.name) {
            let base = explore.name.clone();
            let mut n = 2;
            while self.explores.contains_key(&format!("{base}_{n}")) {
                n += 1;
            }
            explore.name = format!("{base}_{n}");
        }
        let name = explore.name.clone();
        self.explores.insert(name.clone(), explore);
        name
    }

    /// `(explore, view)` pairs where the explore references a view the project lacks.
    pub fn dangling_references(&self) -> Vec<(String, String)> {
        let mut missing = Vec::new();
        for explore in self.explores.values() {
            let referenced = std::iter::once(&explore.from).chain(explore.joins.iter().map(|j| &j.view));
            for view in referenced {
                if !self.views.contains_key(view) {
                    missing.push((explore.name.clone(), view.clone()));
                }
            }
        }
        missing
    }
}
