//! End-of-round summary with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{GlossarySignature, IncorrectMatch, RoundState};

/// Score and mistake review for a finished round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundSummary {
    /// Round identifier.
    pub round_id: Uuid,
    /// Signature of the glossary the round was played against.
    pub glossary_signature: GlossarySignature,
    /// Correct answers.
    pub score: usize,
    /// Questions in the round.
    pub total: usize,
    /// Wrong answers, in the order they were given.
    pub incorrect: Vec<IncorrectMatch>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RoundSummary {
    pub(crate) fn from_round(state: &RoundState) -> Self {
        Self {
            round_id: state.id(),
            glossary_signature: state.signature(),
            score: state.score(),
            total: state.total(),
            incorrect: state.incorrect().to_vec(),
            started_at: state.started_at(),
            finished_at: Utc::now(),
        }
    }

    pub fn is_perfect(&self) -> bool {
        self.incorrect.is_empty()
    }

    /// Fraction of correct answers; an empty round counts as 1.0.
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.score as f64 / self.total as f64
        }
    }

    /// Save the summary as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize summary")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write summary to {}", path.display()))?;
        Ok(())
    }

    /// Load a summary from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read summary from {}", path.display()))?;
        let summary: RoundSummary =
            serde_json::from_str(&content).context("failed to parse summary JSON")?;
        Ok(summary)
    }

    /// Format the summary as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Score:** {} / {} ({:.0}%)\n\n",
            self.score,
            self.total,
            self.accuracy() * 100.0
        ));

        if self.incorrect.is_empty() {
            md.push_str("Perfect score! All matches correct.\n");
            return md;
        }

        md.push_str("### Incorrect matches\n\n");
        md.push_str("| Term | Your choice | Correct number | Correct explanation |\n");
        md.push_str("|------|-------------|----------------|---------------------|\n");
        for m in &self.incorrect {
            md.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                m.term,
                m.chosen,
                m.correct,
                m.explanation.replace('|', "\\|")
            ));
        }
        md
    }
}
