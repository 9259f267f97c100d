//! Triple-ingestion and entity-resolution engine.
//!
//! Consumes an unordered stream of subject-predicate-object statements
//! and materializes a typed entity graph, resolving forward references
//! through a deferred-triple ledger and converging the final entity
//! kinds in a fixed post-processing pipeline. Statements are never lost
//! or duplicated: anything that cannot complete immediately is parked
//! keyed by the missing name and replayed when that name resolves, and
//! anything still parked at end-of-stream is resolved by force-creating
//! placeholder entities.
//!
//! ```no_run
//! use owlgraph_ingest::{TripleEngine, rdf};
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut engine = TripleEngine::with_defaults();
//! rdf::load_file(&mut engine, Path::new("pets.ttl"))?;
//! let report = engine.end_of_stream();
//! println!("{} entities", report.entities_created);
//! # Ok(())
//! # }
//! ```

mod engine;
mod ledger;
mod literal;
mod post;
mod report;
mod resource;
mod untyped;

pub mod rdf;

pub use engine::{EngineConfig, TripleEngine};
pub use ledger::{DeferredLedger, PendingTriple};
pub use report::{Diagnostic, DiagnosticKind, LoadReport, Severity};
