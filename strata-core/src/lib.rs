// strata-core/src/lib.rs

#![allow(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::perf)]

// --- HEXAGONAL MODULES ---

// 1. Ports (Interfaces / Traits)
// Contracts for schema discovery and for serializing the assembled project.
pub mod ports;

// 2. Domain
// Metadata, naming rules, type mapping, the LookML intermediate model.
// Depends on nothing else in the crate.
pub mod domain;

// 3. Infrastructure (Adapters)
// Config files, DuckDB catalog, metadata snapshots, LookML writer.
pub mod infrastructure;

// 4. Application (Use Cases)
// View/measure/explore builders and the project assembler.
pub mod application;

// --- GLOBAL ERROR ---
pub mod error;

// --- RE-EXPORTS (FACADE) ---
pub use error::StrataError;
