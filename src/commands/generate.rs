use anyhow::{Context, Result};

use crate::collab::{GenerateOptions, PasswordGenerator};
use crate::config;
use crate::generator::{RandomPasswordGenerator, STRONG_PASSWORD};
use crate::strength::{LocalStrengthEvaluator, MAX_SCORE};

pub fn run(length: usize) -> Result<()> {
    // Works without `dbpass init`; the configured minimum only shapes the warning.
    let min_strength = config::project_root()
        .and_then(|root| config::read(&root))
        .map(|cfg| cfg.min_strength)
        .unwrap_or(config::DEFAULT_MIN_STRENGTH);

    let options = GenerateOptions {
        length,
        ..STRONG_PASSWORD
    };
    let password = zeroize::Zeroizing::new(
        RandomPasswordGenerator
            .generate(options)
            .context("Failed to generate password")?,
    );
    let assessment = LocalStrengthEvaluator::new(min_strength).assess(&password);

    println!("{}", password.as_str());
    eprintln!(
        "Strength: {}/{} {}",
        assessment.score.max(0),
        MAX_SCORE,
        assessment.message
    );
    if !assessment.warning.is_empty() {
        eprintln!("! {}", assessment.warning);
    }

    Ok(())
}
