//! # Findable Types
//!
//! Shared types, port traits and error definitions for the Findable Score
//! audit core. This crate provides the common data model used across the
//! crawl, analysis, retrieval, simulation, scoring and calibration crates,
//! breaking what would otherwise be circular dependencies between them.
//!
//! ## Organization
//!
//! - `error`: the `FindableError` taxonomy and `FindableResult`
//! - `config`: recognized crawl/pipeline/calibration configuration
//! - `crawl`: `CrawlPage`, `CrawlResult`, `Surface`
//! - `extraction`: `ExtractedPage`, `PageMetadata`
//! - `analyzer`: the common `PillarComponent` record shared by all analyzers
//! - `pillar`: `PillarScore` and the `Pillar` enum
//! - `chunk`: `Chunk`, `ChunkType`
//! - `embedding`: `StoredEmbedding`
//! - `question`: `Question`, `QuestionResult`, `SimulationResult`
//! - `score`: `FindableScore`, `Grade`
//! - `calibration`: `CalibrationConfig`, `CalibrationSample`, experiment arms
//! - `run`: `Run`, `RunStatus`, `RunPhase`
//! - `site`: `Site`, `SiteContext`
//! - `ports`: capability traits consumed by the core (persistence, cache, metrics, clock)

pub mod analyzer;
pub mod calibration;
pub mod chunk;
pub mod config;
pub mod crawl;
pub mod embedding;
pub mod error;
pub mod extraction;
pub mod pillar;
pub mod ports;
pub mod question;
pub mod run;
pub mod score;
pub mod site;

pub use error::{FindableError, FindableResult};
