// strata-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic, PartialEq)]
pub enum DomainError {
    #[error("Identifier cannot be empty: {0}")]
    #[diagnostic(
        code(strata::domain::empty_identifier),
        help("The schema layer returned a blank project, dataset, table or column name.")
    )]
    EmptyIdentifier(&'static str),

    #[error("Table '{0}' appears twice in the metadata set")]
    #[diagnostic(
        code(strata::domain::duplicate_table),
        help("Tables are keyed by 'dataset.table'; the schema layer must group columns per table.")
    )]
    DuplicateTable(String),
}
