//! The `glossmatch play` command.

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;

use glossmatch_core::{AccessGate, GlossarySource, GlossaryStore, QuizEngine};

use crate::config::load_config_from;
use crate::session::Session;

pub fn execute(
    glossary_path: Option<PathBuf>,
    pin: Option<String>,
    questions: Option<usize>,
    seed: Option<u64>,
    config_path: Option<PathBuf>,
    summary_out: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let gate = AccessGate::new(config.admin_pin.clone());
    let access = gate.unlock(pin.as_deref());
    if pin.is_some() && !access.is_privileged() {
        if gate.is_enabled() {
            anyhow::bail!("incorrect PIN");
        }
        anyhow::bail!("privileged mode is disabled: no admin_pin is configured");
    }

    let question_count = questions.unwrap_or(config.question_count);
    anyhow::ensure!(question_count >= 1, "questions must be at least 1");

    let store = GlossaryStore::new(config.glossary.clone());
    let source = match glossary_path {
        Some(path) => GlossarySource::File(path),
        None => GlossarySource::Default,
    };
    let glossary = store.load(&source, access)?;

    if access.is_privileged() {
        println!(
            "Privileged mode: glossary {} ({} terms). Type :meta or :load <path>.",
            glossary.signature().short(),
            glossary.len()
        );
    }

    let rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let engine = QuizEngine::new(glossary, question_count);
    let mut session = Session::new(engine, &store, access, rng).with_summary_out(summary_out);

    let stdin = io::stdin();
    let stdout = io::stdout();
    session.run(stdin.lock(), stdout.lock())?;

    Ok(())
}
