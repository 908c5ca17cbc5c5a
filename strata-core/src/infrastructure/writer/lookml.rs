// strata-core/src/infrastructure/writer/lookml.rs

use chrono::{SecondsFormat, Utc};
use std::path::PathBuf;
use tracing::{info, instrument};

use crate::domain::model::{Dimension, DimensionGroup, Explore, Join, Measure, Project, View};
use crate::error::StrataError;
use crate::infrastructure::config::StrataConfig;
use crate::infrastructure::fs::atomic_write;
use crate::ports::writer::ProjectWriter;

const INDENT: &str = "  ";

/// Line buffer with LookML block nesting.
#[derive(Default)]
struct Block {
    lines: Vec<String>,
    depth: usize,
}

impl Block {
    fn line(&mut self, text: impl AsRef<str>) {
        self.lines
            .push(format!("{}{}", INDENT.repeat(self.depth), text.as_ref()));
    }

    fn blank(&mut self) {
        if self.lines.last().is_some_and(|l| !l.is_empty()) {
            self.lines.push(String::new());
        }
    }

    fn open(&mut self, kind: &str, name: &str) {
        self.line(format!("{kind}: {name} {{"));
        self.depth += 1;
    }

    fn close(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.line("}");
    }

    fn finish(mut self) -> String {
        while self.lines.last().is_some_and(|l| l.is_empty()) {
            self.lines.pop();
        }
        if self.lines.is_empty() {
            return String::new();
        }
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }
}

fn quoted(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

fn list<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let items: Vec<String> = items.into_iter().map(|s| s.as_ref().to_string()).collect();
    format!("[{}]", items.join(", "))
}

fn yes(block: &mut Block, key: &str, flag: bool) {
    if flag {
        block.line(format!("{key}: yes"));
    }
}

fn render_dimension(block: &mut Block, dim: &Dimension) {
    block.open("dimension", &dim.name);
    yes(block, "primary_key", dim.primary_key);
    yes(block, "hidden", dim.hidden);
    block.line(format!("type: {}", dim.field_type));
    block.line(format!("sql: {} ;;", dim.sql));
    if let Some(label) = &dim.label {
        block.line(format!("label: {}", quoted(label)));
    }
    if let Some(description) = &dim.description {
        block.line(format!("description: {}", quoted(description)));
    }
    for (key, value) in &dim.params {
        block.line(format!("{key}: {value}"));
    }
    block.close();
}

fn render_group(block: &mut Block, group: &DimensionGroup) {
    block.open("dimension_group", &group.name);
    yes(block, "hidden", group.hidden);
    block.line(format!("type: {}", group.kind.as_str()));
    block.line(format!(
        "timeframes: {}",
        list(group.timeframes.iter().map(|t| t.as_str()))
    ));
    block.line(format!("sql: {} ;;", group.sql));
    if let Some(description) = &group.description {
        block.line(format!("description: {}", quoted(description)));
    }
    block.close();
}

fn render_measure(block: &mut Block, measure: &Measure) {
    block.open("measure", &measure.name);
    block.line(format!("type: {}", measure.kind));
    if let Some(sql) = &measure.sql {
        block.line(format!("sql: {sql} ;;"));
    }
    for (field, expression) in &measure.filters {
        block.line(format!("filters: [{field}: {}]", quoted(expression)));
    }
    if let Some(description) = &measure.description {
        block.line(format!("description: {}", quoted(description)));
    }
    if let Some(format) = &measure.value_format_name {
        block.line(format!("value_format_name: {format}"));
    }
    if !measure.drill_fields.is_empty() {
        block.line(format!("drill_fields: {}", list(&measure.drill_fields)));
    }
    block.close();
}

fn render_view(block: &mut Block, view: &View) {
    block.open("view", &view.name);
    block.line(format!("sql_table_name: {} ;;", view.sql_table_name));
    if let Some(description) = &view.description {
        block.line(format!("description: {}", quoted(description)));
    }

    for dim in &view.dimensions {
        block.blank();
        render_dimension(block, dim);
    }
    for group in &view.dimension_groups {
        block.blank();
        render_group(block, group);
    }
    for measure in &view.measures {
        block.blank();
        render_measure(block, measure);
    }

    block.blank();
    block.open("set", &view.drill_set.name);
    block.line(format!("fields: {}", list(&view.drill_set.fields)));
    block.close();
    block.close();
}

fn render_join(block: &mut Block, join: &Join) {
    block.open("join", &join.view);
    block.line(format!("type: {}", join.join_type.as_str()));
    block.line(format!("relationship: {}", join.relationship.as_str()));
    block.line(format!("sql_on: {} ;;", join.sql_on));
    if !join.fields.is_empty() {
        block.line(format!("fields: {}", list(&join.fields)));
    }
    block.close();
}

fn render_explore(block: &mut Block, explore: &Explore) {
    block.open("explore", &explore.name);
    block.line(format!("from: {}", explore.from));
    block.line(format!("view_name: {}", explore.from));
    if let Some(description) = &explore.description {
        block.line(format!("description: {}", quoted(description)));
    }
    if !explore.fields.is_empty() {
        block.line(format!("fields: {}", list(&explore.fields)));
    }
    for join in &explore.joins {
        block.blank();
        render_join(block, join);
    }
    block.close();
}

/// All views of the project, in name order.
pub fn render_views(project: &Project) -> String {
    let mut block = Block::default();
    for view in project.views.values() {
        render_view(&mut block, view);
        block.blank();
    }
    block.finish()
}

/// Model-level preamble followed by all explores, in name order.
pub fn render_explores(project: &Project, connection: &str, views_include: &str) -> String {
    let mut block = Block::default();
    block.line(format!("connection: {}", quoted(connection)));
    block.line(format!("include: {}", quoted(views_include)));
    block.blank();
    for explore in project.explores.values() {
        render_explore(&mut block, explore);
        block.blank();
    }
    block.finish()
}

fn header() -> String {
    format!(
        "# Generated by strata at {}. Manual edits will be overwritten.\n\n",
        Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
    )
}

/// Writes the views file and the explores file of a Looker project.
pub struct LookmlWriter {
    views_file: PathBuf,
    explores_file: PathBuf,
    connection: String,
    views_include: String,
}

impl LookmlWriter {
    pub fn new(views_file: PathBuf, explores_file: PathBuf, connection: &str, views_include: &str) -> Self {
        Self {
            views_file,
            explores_file,
            connection: connection.to_string(),
            views_include: views_include.to_string(),
        }
    }

    pub fn from_config(config: &StrataConfig) -> Self {
        Self::new(
            config.views_file(),
            config.explores_file(),
            &config.looker.connection,
            &format!("/{}", config.looker.views_path.trim_start_matches("./")),
        )
    }
}

impl ProjectWriter for LookmlWriter {
    #[instrument(skip_all)]
    fn write(&self, project: &Project) -> Result<Vec<PathBuf>, StrataError> {
        let header = header();

        let views = format!("{header}{}", render_views(project));
        atomic_write(&self.views_file, views)?;
        info!(path = ?self.views_file, views = project.views.len(), "Views written");

        let explores = format!(
            "{header}{}",
            render_explores(project, &self.connection, &self.views_include)
        );
        atomic_write(&self.explores_file, explores)?;
        info!(path = ?self.explores_file, explores = project.explores.len(), "Explores written");

        Ok(vec![self.views_file.clone(), self.explores_file.clone()])
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::ProjectAssembler;
    use crate::domain::metadata::{ColumnMetadata, TableMetadata, TableSet};
    use crate::domain::rules::{ModelRules, TypeMappingRule};
    use anyhow::Result;
    use std::fs;
    use tempfile::tempdir;

    fn project() -> Result<Project> {
        let users = TableMetadata::new("acme", "app", "users")?
            .with_description("Registered \"active\" users")
            .with_column(ColumnMetadata::new("user_pk", "INT64")?.primary_key())
            .with_column(ColumnMetadata::new("email", "STRING")?.with_description("Login email"))
            .with_column(ColumnMetadata::new("created_at", "TIMESTAMP")?)
            .with_column(ColumnMetadata::new("organization_fk", "INT64")?);
        let organizations = TableMetadata::new("acme", "app", "organizations")?
            .with_column(ColumnMetadata::new("organization_pk", "INT64")?.primary_key())
            .with_column(ColumnMetadata::new("name", "STRING")?);

        let rules = ModelRules {
            type_mapping: vec![
                TypeMappingRule::dimension("STRING", "string"),
                TypeMappingRule::dimension("INT64", "number"),
            ],
            ..Default::default()
        };
        let tables = TableSet::try_from(vec![users, organizations])?;
        Ok(ProjectAssembler::new(&rules).assemble(&tables))
    }

    #[test]
    fn test_render_views() -> Result<()> {
        insta::assert_snapshot!(render_views(&project()?), @r#"
        view: organizations {
          sql_table_name: `acme.app.organizations` ;;

          dimension: organization_pk {
            primary_key: yes
            hidden: yes
            type: number
            sql: ${TABLE}.organization_pk ;;
          }

          dimension: name {
            type: string
            sql: ${TABLE}.name ;;
          }

          measure: count {
            type: count
            description: "Count of records"
            drill_fields: [detail*]
          }

          set: detail {
            fields: [name]
          }
        }

        view: users {
          sql_table_name: `acme.app.users` ;;
          description: "Registered \"active\" users"

          dimension: user_pk {
            primary_key: yes
            hidden: yes
            type: number
            sql: ${TABLE}.user_pk ;;
          }

          dimension: email {
            type: string
            sql: ${TABLE}.email ;;
            description: "Login email"
          }

          dimension: organization_fk {
            hidden: yes
            type: number
            sql: ${TABLE}.organization_fk ;;
          }

          dimension_group: created {
            type: time
            timeframes: [raw, time, date, week, month, quarter, year]
            sql: ${TABLE}.created_at ;;
          }

          measure: count {
            type: count
            description: "Count of records"
            drill_fields: [detail*]
          }

          set: detail {
            fields: [email]
          }
        }
        "#);
        Ok(())
    }

    #[test]
    fn test_render_explores() -> Result<()> {
        insta::assert_snapshot!(
            render_explores(&project()?, "warehouse", "/views/base.view.lkml"),
            @r#"
        connection: "warehouse"
        include: "/views/base.view.lkml"

        explore: organizations {
          from: organizations
          view_name: organizations
          fields: [organization_pk, name]
        }

        explore: users {
          from: users
          view_name: users
          description: "Explore Registered \"active\" users"
          fields: [user_pk, email, created_at]
        }

        explore: users_with_organizations {
          from: users
          view_name: users
          description: "Analysis of users with organizations"

          join: organizations {
            type: left_outer
            relationship: many_to_one
            sql_on: ${users}.organization_fk = ${organizations}.organization_pk ;;
          }
        }
        "#
        );
        Ok(())
    }

    #[test]
    fn test_writer_creates_both_files() -> Result<()> {
        let dir = tempdir()?;
        let writer = LookmlWriter::new(
            dir.path().join("views/base/base.view.lkml"),
            dir.path().join("explores/base.explores.lkml"),
            "warehouse",
            "/views/base/base.view.lkml",
        );

        let written = writer.write(&project()?)?;
        assert_eq!(written.len(), 2);

        let views = fs::read_to_string(&written[0])?;
        assert!(views.starts_with("# Generated by strata at "));
        assert!(views.contains("view: users {"));

        let explores = fs::read_to_string(&written[1])?;
        assert!(explores.contains("connection: \"warehouse\""));
        assert!(explores.contains("explore: users_with_organizations {"));
        Ok(())
    }

    #[test]
    fn test_empty_project_still_writes_preamble() -> Result<()> {
        let rendered = render_explores(&Project::new(), "warehouse", "/v.view.lkml");
        assert_eq!(rendered, "connection: \"warehouse\"\ninclude: \"/v.view.lkml\"\n");
        assert!(render_views(&Project::new()).is_empty());
        Ok(())
    }
}
