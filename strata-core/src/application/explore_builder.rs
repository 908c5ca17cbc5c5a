// strata-core/src/application/explore_builder.rs

use tracing::{debug, info};

use crate::domain::{FieldClassifier, TypeMapper};
use crate::domain::metadata::{TableMetadata, TableSet};
use crate::domain::model::{Explore, Join};
use crate::domain::rules::{CustomExplore, NamingRules};

const MAX_SUGGESTED_FIELDS: usize = 6;
const MAX_SUGGESTED_STRINGS: usize = 3;
const MAX_SUGGESTED_TIMES: usize = 2;

/// A foreign key that resolved to another table's primary key.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyRelationship<'t> {
    pub base: &'t TableMetadata,
    pub fk_column: String,
    pub joined: &'t TableMetadata,
    pub pk_column: String,
}

pub struct ExploreBuilder<'a> {
    naming: &'a NamingRules,
    classifier: &'a FieldClassifier,
    mapper: &'a TypeMapper,
}

impl<'a> ExploreBuilder<'a> {
    pub fn new(naming: &'a NamingRules, classifier: &'a FieldClassifier, mapper: &'a TypeMapper) -> Self {
        Self {
            naming,
            classifier,
            mapper,
        }
    }

    /// One base explore per table, then one joined explore per detected relationship.
    pub fn build_all(&self, tables: &TableSet) -> Vec<Explore> {
        let mut explores: Vec<Explore> = tables.iter().map(|t| self.base_explore(t)).collect();

        let relationships = self.detect_relationships(tables);
        info!(
            base = explores.len(),
            relationships = relationships.len(),
            "Explores resolved"
        );
        explores.extend(relationships.iter().map(|r| self.joined_explore(r)));
        explores
    }

    pub fn base_explore(&self, table: &TableMetadata) -> Explore {
        let view = self.naming.view_name(&table.table_id);
        let mut explore = Explore::new(&self.naming.explore_name(&table.table_id), &view);
        explore.description = table.description.as_ref().map(|d| format!("Explore {d}"));
        explore.fields = self.suggested_fields(table);
        explore
    }

    /// Primary key, a few visible strings, a couple of time columns.
    /// Columns without a generated field are never suggested.
    fn suggested_fields(&self, table: &TableMetadata) -> Vec<String> {
        let generated = || table.columns.iter().filter(|c| self.mapper.covers(c));

        let primary_key = generated().find(|c| self.classifier.column_is_primary_key(c));
        let mut fields: Vec<String> = primary_key.map(|c| c.name.clone()).into_iter().collect();

        fields.extend(
            generated()
                .filter(|c| primary_key.is_none_or(|pk| pk.name != c.name))
                .filter(|c| c.is_string_type() && !self.classifier.should_hide(&c.name))
                .take(MAX_SUGGESTED_STRINGS)
                .map(|c| c.name.clone()),
        );
        fields.extend(
            generated()
                .filter(|c| c.is_time_group_type())
                .take(MAX_SUGGESTED_TIMES)
                .map(|c| c.name.clone()),
        );
        fields.truncate(MAX_SUGGESTED_FIELDS);
        fields
    }

    /// Scans every foreign key of every table, in table order. The first
    /// table named after the key that has a primary key wins.
    pub fn detect_relationships<'t>(&self, tables: &'t TableSet) -> Vec<KeyRelationship<'t>> {
        let mut relationships = Vec::new();

        for base in tables {
            for column in base.columns.iter().filter(|c| self.classifier.column_is_foreign_key(c)) {
                let Some(target) = self.classifier.infer_referenced_table(&column.name) else {
                    debug!(table = %base.table_key(), column = %column.name, "No table name inferable");
                    continue;
                };

                let resolved = tables
                    .iter()
                    .filter(|t| t.table_id == target || t.table_id.ends_with(&format!("_{target}")))
                    .find_map(|t| self.classifier.find_primary_key(t).map(|pk| (t, pk)));

                match resolved {
                    Some((joined, pk)) => relationships.push(KeyRelationship {
                        base,
                        fk_column: column.name.clone(),
                        joined,
                        pk_column: pk.name.clone(),
                    }),
                    None => debug!(
                        table = %base.table_key(),
                        column = %column.name,
                        target = %target,
                        "No joinable table found"
                    ),
                }
            }
        }
        relationships
    }

    pub fn joined_explore(&self, relationship: &KeyRelationship<'_>) -> Explore {
        let base_view = self.naming.view_name(&relationship.base.table_id);
        let joined_view = self.naming.view_name(&relationship.joined.table_id);

        let mut explore = Explore::new(&format!("{base_view}_with_{joined_view}"), &base_view);
        explore.description = Some(format!(
            "Analysis of {} with {}",
            relationship.base.table_id, relationship.joined.table_id
        ));
        explore.joins.push(Join::on_keys(
            &base_view,
            &relationship.fk_column,
            &joined_view,
            &relationship.pk_column,
        ));
        explore
    }

    pub fn custom_explore(&self, config: &CustomExplore) -> Explore {
        let mut explore = Explore::new(&config.name, &config.base_view);
        explore.description = config.description.clone();
        explore.joins = config
            .joins
            .iter()
            .map(|j| Join {
                view: j.view.clone(),
                join_type: j.join_type,
                relationship: j.relationship,
                sql_on: j.sql_on.clone(),
                fields: j.fields.clone(),
            })
            .collect();
        explore
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::metadata::ColumnMetadata;
    use crate::domain::model::{JoinType, Relationship};
    use crate::domain::rules::{CustomJoin, DefaultBehaviors, TypeMappingRule};
    use anyhow::Result;

    fn mapper() -> TypeMapper {
        TypeMapper::new(vec![
            TypeMappingRule::dimension("STRING", "string"),
            TypeMappingRule::dimension("INTEGER", "number"),
        ])
    }

    fn classifier() -> FieldClassifier {
        FieldClassifier::new(&NamingRules::default(), &DefaultBehaviors::default())
    }

    fn users() -> Result<TableMetadata> {
        Ok(TableMetadata::new("p", "app", "users")?
            .with_description("application users")
            .with_column(ColumnMetadata::new("user_pk", "INTEGER")?.primary_key())
            .with_column(ColumnMetadata::new("email", "STRING")?)
            .with_column(ColumnMetadata::new("created_at", "TIMESTAMP")?)
            .with_column(ColumnMetadata::new("organization_fk", "INTEGER")?))
    }

    fn organizations() -> Result<TableMetadata> {
        Ok(TableMetadata::new("p", "app", "organizations")?
            .with_column(ColumnMetadata::new("organization_pk", "INTEGER")?.primary_key())
            .with_column(ColumnMetadata::new("name", "STRING")?))
    }

    #[test]
    fn test_users_and_organizations() -> Result<()> {
        let naming = NamingRules::default();
        let classifier = classifier();
        let mapper = mapper();
        let builder = ExploreBuilder::new(&naming, &classifier, &mapper);
        let tables = TableSet::try_from(vec![users()?, organizations()?])?;

        let explores = builder.build_all(&tables);
        let names: Vec<_> = explores.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["users", "organizations", "users_with_organizations"]);

        let base = &explores[0];
        assert_eq!(base.from, "users");
        assert_eq!(base.description.as_deref(), Some("Explore application users"));
        assert_eq!(base.fields, vec!["user_pk", "email", "created_at"]);
        assert!(base.joins.is_empty());
        assert!(explores[1].description.is_none());

        let joined = &explores[2];
        assert_eq!(joined.from, "users");
        assert_eq!(
            joined.description.as_deref(),
            Some("Analysis of users with organizations")
        );
        assert_eq!(joined.joins.len(), 1);
        let join = &joined.joins[0];
        assert_eq!(join.view, "organizations");
        assert_eq!(join.join_type, JoinType::LeftOuter);
        assert_eq!(join.relationship, Relationship::ManyToOne);
        assert_eq!(
            join.sql_on,
            "${users}.organization_fk = ${organizations}.organization_pk"
        );
        Ok(())
    }

    #[test]
    fn test_suffix_matched_table_and_literal_id() -> Result<()> {
        let naming = NamingRules::default();
        let classifier = classifier();
        let mapper = mapper();
        let builder = ExploreBuilder::new(&naming, &classifier, &mapper);

        let orders = TableMetadata::new("p", "shop", "orders")?
            .with_column(ColumnMetadata::new("customer_fk", "INTEGER")?);
        let customers = TableMetadata::new("p", "shop", "dim_customers")?
            .with_column(ColumnMetadata::new("id", "INTEGER")?);
        let tables = TableSet::try_from(vec![orders, customers])?;

        let relationships = builder.detect_relationships(&tables);
        assert_eq!(relationships.len(), 1);
        assert_eq!(relationships[0].joined.table_id, "dim_customers");
        assert_eq!(relationships[0].pk_column, "id");
        Ok(())
    }

    #[test]
    fn test_target_without_primary_key_is_skipped() -> Result<()> {
        let naming = NamingRules::default();
        let classifier = classifier();
        let mapper = mapper();
        let builder = ExploreBuilder::new(&naming, &classifier, &mapper);

        let orders = TableMetadata::new("p", "shop", "orders")?
            .with_column(ColumnMetadata::new("customer_fk", "INTEGER")?)
            .with_column(ColumnMetadata::new("warehouse_fk", "INTEGER")?);
        let keyless = TableMetadata::new("p", "shop", "customers")?
            .with_column(ColumnMetadata::new("name", "STRING")?);
        let keyed = TableMetadata::new("p", "archive", "old_customers")?
            .with_column(ColumnMetadata::new("customer_pk", "INTEGER")?);
        let tables = TableSet::try_from(vec![orders, keyless, keyed])?;

        let relationships = builder.detect_relationships(&tables);
        assert_eq!(relationships.len(), 1);
        assert_eq!(relationships[0].joined.table_id, "old_customers");
        assert_eq!(builder.build_all(&tables).len(), 4);
        Ok(())
    }

    #[test]
    fn test_suggested_fields_are_capped() -> Result<()> {
        let naming = NamingRules::default();
        let classifier = classifier();
        let mapper = mapper();
        let builder = ExploreBuilder::new(&naming, &classifier, &mapper);

        let mut wide = TableMetadata::new("p", "d", "wide")?
            .with_column(ColumnMetadata::new("id", "INTEGER")?);
        for name in ["a", "b", "c", "d"] {
            wide.push_column(ColumnMetadata::new(name, "STRING")?);
        }
        for name in ["t1", "t2", "t3"] {
            wide.push_column(ColumnMetadata::new(name, "DATE")?);
        }

        let explore = builder.base_explore(&wide);
        assert_eq!(explore.fields, vec!["id", "a", "b", "c", "t1", "t2"]);
        Ok(())
    }

    #[test]
    fn test_custom_explore() {
        let naming = NamingRules::default();
        let classifier = classifier();
        let mapper = mapper();
        let builder = ExploreBuilder::new(&naming, &classifier, &mapper);

        let config = CustomExplore {
            name: "sales".into(),
            base_view: "orders".into(),
            description: Some("Sales analysis".into()),
            joins: vec![CustomJoin {
                view: "customers".into(),
                sql_on: "${orders.customer_id} = ${customers.id}".into(),
                join_type: JoinType::Inner,
                relationship: Relationship::ManyToOne,
                fields: vec!["customers.name".into()],
            }],
        };
        let explore = builder.custom_explore(&config);
        assert_eq!(explore.from, "orders");
        assert_eq!(explore.joins[0].join_type, JoinType::Inner);
        assert_eq!(explore.joins[0].fields, vec!["customers.name"]);
    }

    #[test]
    fn test_suggested_fields_skip_unmapped_and_repeat_nothing() -> Result<()> {
        let naming = NamingRules::default();
        let classifier = classifier();
        let mapper = mapper();
        let builder = ExploreBuilder::new(&naming, &classifier, &mapper);

        let products = TableMetadata::new("p", "shop", "products")?
            .with_column(ColumnMetadata::new("id", "STRING")?)
            .with_column(ColumnMetadata::new("label", "VARCHAR")?)
            .with_column(ColumnMetadata::new("price", "BIGNUMERIC")?)
            .with_column(ColumnMetadata::new("name", "STRING")?);
        assert_eq!(builder.base_explore(&products).fields, vec!["id", "name"]);

        // An unmapped primary key is not suggested either.
        let unmapped_key = TableMetadata::new("p", "shop", "tags")?
            .with_column(ColumnMetadata::new("tag_pk", "UUID")?.primary_key())
            .with_column(ColumnMetadata::new("tag", "STRING")?);
        assert_eq!(builder.base_explore(&unmapped_key).fields, vec!["tag"]);
        Ok(())
    }
}
