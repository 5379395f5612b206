//! The `glossmatch validate` command.

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(glossary_path: PathBuf) -> Result<()> {
    let glossary = glossmatch_core::glossary::load_path(&glossary_path)?;

    println!(
        "Glossary: {} ({} terms)",
        glossary_path.display(),
        glossary.len()
    );
    println!("Signature: {}", glossary.signature());

    if !glossary.meta().is_empty() {
        println!("Metadata:");
        for (key, value) in glossary.meta() {
            println!("  {key}: {value}");
        }
    }

    println!("Glossary is valid.");
    Ok(())
}
