//! # hub-core
//!
//! Synthetic patient and visit generation for the clinical hub.
//!
//! This crate provides:
//! - Joint, digit and index samplers (`sampling`, `indices`)
//! - The standard score formulas and activity cut-offs (`scores`)
//! - The patient and treatment-escalation builder (`patient`)
//! - The visit assembler and its `(cohort, visit kind)` strategy table
//! - The `Generator` loop and the `VisitSink` / `Verifier` seams
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rand::{rngs::StdRng, SeedableRng};
//! use hub_config::GeneratorConfig;
//! use hub_core::generate;
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let summary = generate(&GeneratorConfig::default(), &mut rng, &mut sink)?;
//! ```

pub mod assembler;
pub mod catalog;
pub mod generator;
pub mod indices;
pub mod patient;
pub mod profile;
pub mod sampling;
pub mod scores;
pub mod traits;

pub use generator::{generate, CohortSummary, GenerationSummary, Generator};
pub use traits::{Verifier, VisitSink};
