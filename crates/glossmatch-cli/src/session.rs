//! Interactive terminal session: renders rounds and feeds input to the engine.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};
use rand::rngs::StdRng;

use glossmatch_core::{
    Access, GlossarySource, GlossaryStore, QuizEngine, RoundState, RoundSummary,
};

/// A line of user input, interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Answer(usize),
    Restart,
    Quit,
    List,
    Meta,
    Load(PathBuf),
    Help,
    Empty,
    Unknown(String),
}

impl Input {
    fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Input::Empty;
        }
        if let Some(cmd) = line.strip_prefix(':') {
            let (name, arg) = cmd
                .split_once(char::is_whitespace)
                .map(|(n, a)| (n, a.trim()))
                .unwrap_or((cmd, ""));
            return match name {
                "q" | "quit" => Input::Quit,
                "r" | "restart" => Input::Restart,
                "l" | "list" => Input::List,
                "meta" => Input::Meta,
                "h" | "help" => Input::Help,
                "load" if !arg.is_empty() => Input::Load(PathBuf::from(arg)),
                _ => Input::Unknown(line.to_string()),
            };
        }
        match line.parse::<usize>() {
            Ok(n) => Input::Answer(n),
            Err(_) => Input::Unknown(line.to_string()),
        }
    }
}

/// What ended the inner question loop.
enum RoundEnd {
    Finished,
    Restart,
    Quit,
}

/// One user's quiz session over a terminal-like reader/writer pair.
pub struct Session<'s> {
    engine: QuizEngine,
    store: &'s GlossaryStore,
    access: Access,
    rng: StdRng,
    summary_out: Option<PathBuf>,
}

impl<'s> Session<'s> {
    pub fn new(engine: QuizEngine, store: &'s GlossaryStore, access: Access, rng: StdRng) -> Self {
        Self {
            engine,
            store,
            access,
            rng,
            summary_out: None,
        }
    }

    /// Write each finished round's summary as JSON to `path`.
    #[must_use]
    pub fn with_summary_out(mut self, path: Option<PathBuf>) -> Self {
        self.summary_out = path;
        self
    }

    /// Play rounds until the user quits, declines another round, or input
    /// ends. Returns the summaries of all finished rounds.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        mut input: R,
        mut out: W,
    ) -> Result<Vec<RoundSummary>> {
        let mut summaries = Vec::new();

        loop {
            let mut state = self.engine.start_round_with(&mut self.rng);
            writeln!(out)?;
            writeln!(
                out,
                "Match each term with the number of its explanation ({} questions).",
                state.total()
            )?;
            self.render_explanations(&state, &mut out)?;

            match self.play_round(&mut state, &mut input, &mut out)? {
                RoundEnd::Quit => break,
                RoundEnd::Restart => continue,
                RoundEnd::Finished => {}
            }

            let summary = self.engine.final_summary(&state)?;
            render_summary(&summary, &mut out)?;
            if let Some(path) = &self.summary_out {
                summary.save_json(path)?;
                tracing::info!(path = %path.display(), "round summary saved");
            }
            summaries.push(summary);

            write!(out, "Play again? [y/N]: ")?;
            out.flush()?;
            match read_line(&mut input)? {
                Some(line) if matches!(line.trim(), "y" | "Y" | "yes") => continue,
                _ => break,
            }
        }

        writeln!(out, "Goodbye.")?;
        Ok(summaries)
    }

    fn play_round<R: BufRead, W: Write>(
        &mut self,
        state: &mut RoundState,
        input: &mut R,
        out: &mut W,
    ) -> Result<RoundEnd> {
        while !state.is_finished() {
            let question = self.engine.current_question(state)?;
            writeln!(out)?;
            writeln!(
                out,
                "Question {} of {}: {}",
                question.position, question.total, question.term
            )?;
            write!(out, "Enter explanation number: ")?;
            out.flush()?;

            let Some(line) = read_line(input)? else {
                writeln!(out)?;
                return Ok(RoundEnd::Quit);
            };

            match Input::parse(&line) {
                Input::Answer(n) => match self.engine.submit_answer(state, n) {
                    Ok(outcome) if outcome.correct => writeln!(out, "Correct!")?,
                    Ok(_) => writeln!(out, "Incorrect.")?,
                    Err(e) => writeln!(out, "{e}")?,
                },
                Input::Restart => {
                    writeln!(out, "Restarting with a fresh round.")?;
                    return Ok(RoundEnd::Restart);
                }
                Input::Quit => return Ok(RoundEnd::Quit),
                Input::List => self.render_explanations(state, out)?,
                Input::Meta => self.render_meta(out)?,
                Input::Load(path) => {
                    if self.load_glossary(path, out)? {
                        return Ok(RoundEnd::Restart);
                    }
                }
                Input::Help => render_help(out)?,
                Input::Empty => {}
                Input::Unknown(text) => writeln!(
                    out,
                    "'{text}' is not a number from 1 to {}. Type :help for commands.",
                    state.explanation_order().len()
                )?,
            }
        }
        Ok(RoundEnd::Finished)
    }

    /// Returns `true` when the glossary changed and the round must restart.
    fn load_glossary<W: Write>(&mut self, path: PathBuf, out: &mut W) -> Result<bool> {
        if !self.access.is_privileged() {
            writeln!(out, "Loading a glossary requires privileged mode.")?;
            return Ok(false);
        }
        match self.store.load(&GlossarySource::File(path), self.access) {
            Ok(glossary) => {
                if self.engine.replace_glossary(glossary) {
                    writeln!(
                        out,
                        "Glossary changed ({} terms). Starting a new round.",
                        self.engine.glossary().len()
                    )?;
                    Ok(true)
                } else {
                    writeln!(out, "Glossary unchanged; continuing the current round.")?;
                    Ok(false)
                }
            }
            Err(e) => {
                writeln!(out, "Could not load glossary: {e}")?;
                Ok(false)
            }
        }
    }

    fn render_explanations<W: Write>(&self, state: &RoundState, out: &mut W) -> Result<()> {
        writeln!(out, "Explanations:")?;
        for choice in state.choices() {
            writeln!(out, "  {:>2}. {}", choice.number, choice.explanation)?;
        }
        Ok(())
    }

    fn render_meta<W: Write>(&self, out: &mut W) -> Result<()> {
        if !self.access.is_privileged() {
            writeln!(out, "Glossary metadata is only shown in privileged mode.")?;
            return Ok(());
        }
        let meta = self.engine.glossary().meta();
        if meta.is_empty() {
            writeln!(out, "This glossary has no metadata.")?;
        }
        for (key, value) in meta {
            writeln!(out, "  {key}: {value}")?;
        }
        writeln!(out, "  signature: {}", self.engine.signature())?;
        Ok(())
    }
}

fn render_help<W: Write>(out: &mut W) -> Result<()> {
    writeln!(out, "  <number>        answer with that explanation number")?;
    writeln!(out, "  :list           show the explanations again")?;
    writeln!(out, "  :restart        start a fresh round")?;
    writeln!(out, "  :meta           show glossary metadata (privileged)")?;
    writeln!(out, "  :load <path>    replace the glossary (privileged)")?;
    writeln!(out, "  :quit           leave")?;
    Ok(())
}

pub(crate) fn render_summary<W: Write>(summary: &RoundSummary, out: &mut W) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "Final score: {} / {}", summary.score, summary.total)?;

    if summary.is_perfect() {
        writeln!(out, "Perfect score! All matches correct.")?;
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![
        "Term",
        "Your choice",
        "Correct number",
        "Correct explanation",
    ]);
    for m in &summary.incorrect {
        table.add_row(vec![
            Cell::new(&m.term),
            Cell::new(m.chosen),
            Cell::new(m.correct),
            Cell::new(&m.explanation),
        ]);
    }
    writeln!(out, "Review: incorrect matches")?;
    writeln!(out, "{table}")?;
    Ok(())
}

fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}
