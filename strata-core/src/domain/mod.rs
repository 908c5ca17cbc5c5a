pub mod classifier;
pub mod error;
pub mod metadata;
pub mod model;
pub mod rules;
pub mod type_mapper;

pub use classifier::FieldClassifier;
pub use error::DomainError;
pub use type_mapper::TypeMapper;
