//! The `glossmatch signature` command.

use std::path::PathBuf;

use anyhow::Result;

use glossmatch_core::{detect_glossary_change, GlossarySignature};

pub fn execute(glossary_path: PathBuf, previous: Option<String>) -> Result<()> {
    let glossary = glossmatch_core::glossary::load_path(&glossary_path)?;
    println!("{}", glossary.signature());

    if let Some(previous) = previous {
        let previous: GlossarySignature = previous
            .parse()
            .map_err(|e: String| anyhow::anyhow!("invalid --previous: {e}"))?;
        if detect_glossary_change(&previous, &glossary) {
            println!("changed");
        } else {
            println!("unchanged");
        }
    }

    Ok(())
}
