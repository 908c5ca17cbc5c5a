// strata-core/src/infrastructure/writer/mod.rs

pub mod lookml;

pub use lookml::{LookmlWriter, render_explores, render_views};
