//! lawbot-core
//!
//! Shared vocabulary for the LawBot answer pipeline: domain types, the error
//! enum, the embedder/index/generator traits, layered configuration, and the
//! corpus processor used when building a vectorstore.

pub mod config;
pub mod data_processor;
pub mod error;
pub mod traits;
pub mod types;
