#![forbid(unsafe_code)]

//! Tolerant decoder and typed domain model for athletic workout plans.
//!
//! This crate provides:
//! - Domain types (workouts, steps, repetitions, goals)
//! - Alias tables and fuzzy matching for loosely spelled tags
//! - A decoder from generated JSON text to a typed workout
//! - Normalization of redundant bounds
//! - Structural similarity that ignores instance identifiers

pub mod types;
pub mod error;
pub mod bounds;
pub mod vocabulary;
pub mod fuzzy;
pub mod config;
pub mod logging;
pub mod similarity;
pub mod normalize;
pub mod decoder;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use bounds::Bounds;
pub use config::Config;
pub use similarity::Similar;
pub use normalize::Compress;
pub use decoder::{decode, strip_code_fence, Decoder};
