//! Claim Analysis Pipeline
//!
//! - **Claim Analyzer**: asks the language model for a trustworthiness assessment
//! - **Claim Pipeline**: runs one upload through extraction and analysis
//!
//! ## Pipeline Overview
//!
//! ```text
//! Uploaded file
//!      │
//!      ▼
//! ┌─────────────┐
//! │  Transient  │  → uploads/<filename>
//! │   storage   │
//! └─────────────┘
//!      │
//!      ▼
//! ┌─────────────┐
//! │  Document   │  → cleaned text (PDF or TXT)
//! │  Processor  │
//! └─────────────┘
//!      │
//!      ▼
//! ┌─────────────┐
//! │   Claim     │  → summary, score, detailed analysis
//! │  Analyzer   │
//! └─────────────┘
//!      │
//!      ▼
//!  results/<stem>_analysis.json + response
//! ```
//!
//! The transient upload is removed on every exit path.

pub mod claim;
pub mod pipeline;

pub use claim::{AnalysisError, ClaimAnalyzer};
pub use pipeline::{ClaimPipeline, Upload};
