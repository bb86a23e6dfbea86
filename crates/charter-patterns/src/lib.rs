//! # Charter Patterns - Deterministic Policy Layer (Layer A)
//!
//! Layer A is the first and cheapest check in the Charter moderation pipeline.
//! It runs inline on every submission, before any network call is made, and
//! rejects content that names a forbidden concept outright.
//!
//! ## Purpose
//!
//! This crate provides:
//!
//! 1. **The Forbidden Catalog** - Twelve fixed concepts from the constitutional
//!    policy, each with a prose description and a compiled term matcher.
//!
//! 2. **The Rule Engine** - Evaluates every matcher independently against the
//!    full content and reports all matches, in catalog order, with timing.
//!
//! ## Matching Policy
//!
//! | Input | Result | Why |
//! |-------|--------|-----|
//! | `"gun."`, `"(gun)"`, `"GUN!"` | match | punctuation is a word boundary |
//! | `"gunnel"` | no match | term embedded in an unrelated word |
//! | `"propagation"` | no match | shares a prefix with `propaganda` only |
//! | `"s\u{200B}urveillance"` | no match | accepted gap, left to Layer B |
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                     PATTERN LAYER                         │
//! ├───────────────────────────────────────────────────────────┤
//! │                                                           │
//! │   bootstrap:  PatternCatalog::standard()  ──▶ Arc<…>     │
//! │                                               │           │
//! │                                               ▼           │
//! │   per call:   RuleEngine::evaluate(text) ──▶ LayerAResult │
//! │                                                           │
//! │   ┌──────────────┐ ┌──────────────┐     ┌──────────────┐  │
//! │   │ surveillance │ │   weapons    │ ... │ hate_speech  │  │
//! │   │  (?i)\b..\b  │ │  (?i)\b..\b  │     │  (?i)\b..\b  │  │
//! │   └──────────────┘ └──────────────┘     └──────────────┘  │
//! │          each matcher runs independently                  │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use charter_patterns::{ForbiddenPattern, PatternCatalog, RuleEngine};
//!
//! let catalog = Arc::new(PatternCatalog::standard().unwrap());
//! let engine = RuleEngine::new(catalog);
//!
//! let result = engine.evaluate("Install surveillance cameras at every entrance");
//! assert!(!result.passed);
//! assert_eq!(result.matched_patterns, vec![ForbiddenPattern::Surveillance]);
//! ```

pub mod catalog;
pub mod engine;
pub mod models;

pub use catalog::{PatternCatalog, PatternDefinition};
pub use engine::RuleEngine;
pub use models::{CatalogError, ForbiddenPattern, LayerAResult, PATTERN_COUNT};

/// Result type for catalog construction.
pub type Result<T> = std::result::Result<T, CatalogError>;
