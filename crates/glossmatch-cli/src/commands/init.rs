//! The `glossmatch init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    write_unless_exists(Path::new("glossmatch.toml"), SAMPLE_CONFIG)?;
    write_unless_exists(Path::new("glossary.json"), SAMPLE_GLOSSARY)?;

    println!("\nNext steps:");
    println!("  1. Edit glossary.json with your own terms");
    println!("  2. Run: glossmatch validate --glossary glossary.json");
    println!("  3. Run: glossmatch play");

    Ok(())
}

fn write_unless_exists(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# glossmatch configuration

glossary = "glossary.json"
question_count = 10

# Unlocks privileged mode (play --pin ...): replacing the glossary at
# runtime and viewing its metadata.
admin_pin = "${GLOSSMATCH_ADMIN_PIN}"
"#;

const SAMPLE_GLOSSARY: &str = r#"{
  "_meta": {
    "title": "Bhagavad Gita, Chapter 15",
    "version": "1"
  },
  "Aśvattha": "The world-tree of samsāra (empirical existence), ever-changing and impermanent; that which does not remain the same even till tomorrow.",
  "Mūlam": "The root or cause; symbolically Brahman, the unseen foundation from which the world appears to arise.",
  "Ūrdhva-mūlam": "Having its roots above; indicating that the origin of the universe lies in the transcendental Reality, not in matter.",
  "Adhaḥ-śākham": "Branches growing downward; the manifestation of the world into grosser levels of existence.",
  "Chandāṁsi": "The Vedic hymns; rituals and promises that nourish worldly involvement when misunderstood.",
  "Parṇāni": "Leaves of the tree; symbolic of Vedic injunctions that sustain worldly life.",
  "Guṇa": "The three qualities (sattva, rajas, and tamas) which bind consciousness to matter.",
  "Karma-anubandhīni": "Bound by actions; indicating that worldly life continues due to past actions and their vasanas.",
  "Asaṅga-śastra": "The weapon of detachment; discriminative knowledge used to cut attachment to the world.",
  "Padam Avyayam": "The imperishable state; Brahman, beyond change, time, and decay.",
  "Puruṣa": "Consciousness, the Self, which illumines all experiences.",
  "Kṣara Puruṣa": "The perishable self; the ego-bound individual identified with body and mind.",
  "Akṣara Puruṣa": "The imperishable; the subtle, unmanifest causal state (Hiraṇyagarbha or total mind).",
  "Uttama Puruṣa": "The Supreme Self (Puruṣottama); Brahman that transcends both the perishable and imperishable.",
  "Paramātma": "The Supreme Consciousness that enlivens, sustains, and governs all beings.",
  "Jīva-bhūtaḥ": "The individual soul; Pure Consciousness conditioned by the mind and senses.",
  "Vaishvānara": "The digestive fire; the same Consciousness functioning as the power of digestion in all beings.",
  "Smṛti": "Memory; the power of recollection bestowed by the Lord.",
  "Apohanam": "Forgetfulness; also governed by the Lord, essential for functional living."
}
"#;
