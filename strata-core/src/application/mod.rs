// strata-core/src/application/mod.rs

pub mod assembler;
pub mod explore_builder;
pub mod measures;
pub mod view_builder;

pub mod generate;

// --- RE-EXPORTS (FACADE PATTERN) ---
// Lets the CLI write `use strata_core::application::{run_generate, ProjectAssembler};`
// without knowing the file layout.

pub use assembler::ProjectAssembler;
pub use explore_builder::{ExploreBuilder, KeyRelationship};
pub use generate::{GenerateOutcome, GenerateSummary, run_generate};
pub use measures::MeasureSynthesizer;
pub use view_builder::{ViewBuilder, strip_time_suffix};
