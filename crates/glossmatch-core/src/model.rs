//! Core data model types for glossmatch.
//!
//! A [`Glossary`] is the question bank, a [`RoundState`] is one pass through
//! a sample of it. Rounds are plain values: the presentation layer owns them
//! and hands them back to the [`QuizEngine`](crate::engine::QuizEngine) for
//! every action.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ValidationError, ValidationProblem};

/// Reserved top-level key holding glossary metadata instead of a term.
pub const META_KEY: &str = "_meta";

/// Auxiliary key/value metadata (author, version, notes, ...).
pub type GlossaryMeta = BTreeMap<String, String>;

/// A validated term → explanation mapping.
///
/// Terms are unique and non-empty, explanations are non-empty and stored
/// trimmed. Entries are kept in key order, which is also the canonical order
/// used for the [`GlossarySignature`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Glossary {
    entries: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    meta: GlossaryMeta,
}

impl Glossary {
    /// Build a glossary from term/explanation pairs, applying the same rules
    /// as [`validate`](crate::glossary::validate).
    pub fn from_entries<I, K, V>(entries: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut map = BTreeMap::new();
        for (term, explanation) in entries {
            let term: String = term.into();
            let explanation: String = explanation.into();
            if term.trim().is_empty() {
                return Err(ValidationError::new(term, ValidationProblem::EmptyKey));
            }
            let explanation = explanation.trim();
            if explanation.is_empty() {
                return Err(ValidationError::new(
                    term,
                    ValidationProblem::EmptyExplanation,
                ));
            }
            map.insert(term, explanation.to_string());
        }
        Self::assemble(map, GlossaryMeta::new())
    }

    pub(crate) fn assemble(
        entries: BTreeMap<String, String>,
        meta: GlossaryMeta,
    ) -> Result<Self, ValidationError> {
        if entries.is_empty() {
            return Err(ValidationError::new("<root>", ValidationProblem::NoEntries));
        }
        Ok(Self { entries, meta })
    }

    /// Attach metadata, replacing any existing metadata.
    #[must_use]
    pub fn with_meta(mut self, meta: GlossaryMeta) -> Self {
        self.meta = meta;
        self
    }

    /// Number of quiz terms (metadata is not counted).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn explanation(&self, term: &str) -> Option<&str> {
        self.entries.get(term).map(String::as_str)
    }

    pub fn contains_term(&self, term: &str) -> bool {
        self.entries.contains_key(term)
    }

    /// Terms in canonical (sorted) order.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Explanations in canonical term order.
    pub fn explanations(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn meta(&self) -> &GlossaryMeta {
        &self.meta
    }

    /// Content fingerprint over the entries, ignoring metadata.
    pub fn signature(&self) -> GlossarySignature {
        crate::glossary::signature(self)
    }

    pub(crate) fn entry_map(&self) -> &BTreeMap<String, String> {
        &self.entries
    }
}

/// SHA-256 fingerprint of a glossary's canonical serialization.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct GlossarySignature([u8; 32]);

impl GlossarySignature {
    pub(crate) fn from_digest(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// First 12 hex characters, for log lines and status bars.
    pub fn short(&self) -> String {
        self.to_string()[..12].to_string()
    }
}

impl fmt::Display for GlossarySignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0 {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for GlossarySignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GlossarySignature({})", self.short())
    }
}

impl FromStr for GlossarySignature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() != 64 || !s.is_ascii() {
            return Err(format!(
                "signature must be 64 hex characters, got {} characters",
                s.len()
            ));
        }
        let mut bytes = [0u8; 32];
        for (i, byte) in bytes.iter_mut().enumerate() {
            let pair = &s[i * 2..i * 2 + 2];
            *byte = u8::from_str_radix(pair, 16)
                .map_err(|_| format!("invalid hex in signature: {pair:?}"))?;
        }
        Ok(Self(bytes))
    }
}

impl From<GlossarySignature> for String {
    fn from(sig: GlossarySignature) -> Self {
        sig.to_string()
    }
}

impl TryFrom<String> for GlossarySignature {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Where a round is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundPhase {
    InProgress,
    Finished,
}

impl fmt::Display for RoundPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundPhase::InProgress => write!(f, "in progress"),
            RoundPhase::Finished => write!(f, "finished"),
        }
    }
}

/// A wrong answer, kept for the end-of-round review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncorrectMatch {
    pub term: String,
    /// The number the user entered.
    pub chosen: usize,
    /// The number that was actually mapped to the term's explanation.
    pub correct: usize,
    pub explanation: String,
}

/// State of one quiz round.
///
/// Created by [`QuizEngine::start_round`](crate::engine::QuizEngine::start_round)
/// and only advanced by
/// [`QuizEngine::submit_answer`](crate::engine::QuizEngine::submit_answer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundState {
    pub(crate) id: Uuid,
    pub(crate) signature: GlossarySignature,
    pub(crate) terms: Vec<String>,
    pub(crate) explanation_order: Vec<String>,
    pub(crate) index: usize,
    pub(crate) score: usize,
    pub(crate) incorrect: Vec<IncorrectMatch>,
    pub(crate) started_at: DateTime<Utc>,
}

impl RoundState {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Signature of the glossary this round was sampled from.
    pub fn signature(&self) -> GlossarySignature {
        self.signature
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn explanation_order(&self) -> &[String] {
        &self.explanation_order
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn incorrect(&self) -> &[IncorrectMatch] {
        &self.incorrect
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn total(&self) -> usize {
        self.terms.len()
    }

    pub fn is_finished(&self) -> bool {
        self.index >= self.terms.len()
    }

    pub fn phase(&self) -> RoundPhase {
        if self.is_finished() {
            RoundPhase::Finished
        } else {
            RoundPhase::InProgress
        }
    }

    /// 1-based number of the first occurrence of `explanation`.
    pub fn number_of(&self, explanation: &str) -> Option<usize> {
        self.explanation_order
            .iter()
            .position(|e| e == explanation)
            .map(|i| i + 1)
    }

    /// All explanations with their 1-based display numbers.
    pub fn choices(&self) -> Vec<Choice<'_>> {
        self.explanation_order
            .iter()
            .enumerate()
            .map(|(i, text)| Choice {
                number: i + 1,
                explanation: text,
            })
            .collect()
    }
}

/// A numbered candidate explanation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Choice<'a> {
    pub number: usize,
    pub explanation: &'a str,
}

/// What the presentation layer needs to render the current question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question<'a> {
    pub term: &'a str,
    /// 1-based position of this question within the round.
    pub position: usize,
    pub total: usize,
    pub choices: Vec<Choice<'a>>,
}

/// Result of submitting one answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub correct_number: usize,
    pub finished: bool,
}
