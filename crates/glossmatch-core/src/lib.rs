//! glossmatch-core — Glossary loading and the quiz round engine.
//!
//! This crate holds everything the quiz needs apart from rendering: glossary
//! parsing and validation, content signatures, round state, and scoring.

pub mod engine;
pub mod error;
pub mod glossary;
pub mod model;
pub mod report;

pub use engine::{detect_glossary_change, QuizEngine, DEFAULT_QUESTION_COUNT};
pub use error::{GlossaryError, QuizError, ValidationError, ValidationProblem};
pub use glossary::{Access, AccessGate, GlossaryFormat, GlossarySource, GlossaryStore};
pub use model::{Glossary, GlossaryMeta, GlossarySignature, RoundPhase, RoundState};
pub use report::RoundSummary;
