//! Local password strength scoring.
//!
//! Produces a 0..=4 score in the same shape as zxcvbn so the widget can gate on a
//! fixed minimum. The estimate is length times the log2 of the character pool,
//! with repeated runs, keyboard-style sequences and well-known passwords penalised.

use async_trait::async_trait;

use crate::collab::StrengthEvaluator;
use crate::error::{DbpassError, Result};
use crate::widget::StrengthAssessment;

pub const MAX_SCORE: i32 = 4;
pub const MAX_PASSWORD_LENGTH: usize = 99;

const SYMBOL_POOL: f64 = 33.0;

const COMMON_PASSWORDS: &[&str] = &[
    "password", "123456", "12345678", "qwerty", "letmein", "welcome", "admin", "iloveyou",
    "monkey", "dragon", "football", "baseball", "sunshine", "princess", "master", "shadow",
    "superman", "trustno1", "postgres", "database", "changeme", "secret", "abc123", "111111",
];

/// Label shown in front of the suggestions for each score.
pub fn score_label(score: i32) -> &'static str {
    match score {
        i32::MIN..=0 => "This password is not acceptable.",
        1 | 2 => "This password is not secure enough.",
        3 => "This password is strong.",
        _ => "This password is very strong.",
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Findings {
    common: bool,
    repeats: usize,
    sequences: usize,
}

pub struct LocalStrengthEvaluator {
    min_strength: i32,
}

impl LocalStrengthEvaluator {
    pub fn new(min_strength: i32) -> Self {
        Self { min_strength }
    }

    /// Synchronous scoring used by `evaluate` and the `generate` command.
    pub fn assess(&self, candidate: &str) -> StrengthAssessment {
        if candidate.is_empty() {
            return StrengthAssessment::default();
        }

        let length = candidate.chars().count();
        if length > MAX_PASSWORD_LENGTH {
            return StrengthAssessment {
                score: 0,
                warning: "Password should be less than 100 characters".into(),
                message: format!("{} Maximum length of password exceeded", score_label(0)),
            };
        }

        let findings = inspect(candidate);
        let score = score(candidate, &findings);

        let mut suggestions = Vec::new();
        if length < 12 && score < MAX_SCORE {
            suggestions.push("Add another word or two. Uncommon words are better.");
        }
        if character_classes(candidate) < 3 && score < MAX_SCORE {
            suggestions.push("Mix upper and lower case letters, numbers and symbols.");
        }
        if findings.repeats > 0 {
            suggestions.push("Avoid repeated words and characters.");
        }
        if findings.sequences > 0 {
            suggestions.push("Avoid sequences.");
        }

        let message = format!("{} {}", score_label(score), suggestions.join(" "))
            .trim_end()
            .to_string();

        let warning = if score < self.min_strength {
            match pattern_warning(&findings) {
                Some(w) => format!("{w}. You need a stronger password."),
                None => "You need a stronger password.".to_string(),
            }
        } else {
            String::new()
        };

        StrengthAssessment {
            score,
            warning,
            message,
        }
    }
}

#[async_trait]
impl StrengthEvaluator for LocalStrengthEvaluator {
    async fn evaluate(&self, candidate: &str) -> Result<StrengthAssessment> {
        let evaluator = LocalStrengthEvaluator::new(self.min_strength);
        let candidate = candidate.to_string();
        tokio::task::spawn_blocking(move || evaluator.assess(&candidate))
            .await
            .map_err(|e| DbpassError::Strength(e.to_string()))
    }
}

fn pattern_warning(findings: &Findings) -> Option<&'static str> {
    if findings.common {
        Some("This is a very common password")
    } else if findings.sequences > 0 {
        Some("Sequences like abc or 6543 are easy to guess")
    } else if findings.repeats > 0 {
        Some("Repeats like \"aaa\" are easy to guess")
    } else {
        None
    }
}

fn character_classes(candidate: &str) -> usize {
    let lower = candidate.chars().any(|c| c.is_lowercase());
    let upper = candidate.chars().any(|c| c.is_uppercase());
    let digit = candidate.chars().any(|c| c.is_ascii_digit());
    let other = candidate.chars().any(|c| !c.is_alphanumeric());
    [lower, upper, digit, other].iter().filter(|b| **b).count()
}

fn pool_size(candidate: &str) -> f64 {
    let mut pool = 0.0;
    if candidate.chars().any(|c| c.is_lowercase()) {
        pool += 26.0;
    }
    if candidate.chars().any(|c| c.is_uppercase()) {
        pool += 26.0;
    }
    if candidate.chars().any(|c| c.is_ascii_digit()) {
        pool += 10.0;
    }
    if candidate.chars().any(|c| !c.is_alphanumeric()) {
        pool += SYMBOL_POOL;
    }
    f64::max(pool, 10.0)
}

fn inspect(candidate: &str) -> Findings {
    let chars: Vec<char> = candidate.chars().collect();
    let mut findings = Findings {
        common: is_common(candidate),
        ..Findings::default()
    };

    // Count characters that extend a run of three or more.
    for window in chars.windows(3) {
        let (a, b, c) = (window[0] as i64, window[1] as i64, window[2] as i64);
        if a == b && b == c {
            findings.repeats += 1;
        } else if (b - a == 1 && c - b == 1) || (a - b == 1 && b - c == 1) {
            findings.sequences += 1;
        }
    }
    findings
}

fn is_common(candidate: &str) -> bool {
    let lowered = candidate.to_lowercase();
    let unleet: String = lowered
        .chars()
        .map(|c| match c {
            '0' => 'o',
            '1' => 'i',
            '3' => 'e',
            '4' => 'a',
            '5' => 's',
            '@' => 'a',
            '$' => 's',
            _ => c,
        })
        .collect();
    let stem = lowered.trim_end_matches(|c: char| c.is_ascii_digit() || c == '!');

    COMMON_PASSWORDS
        .iter()
        .any(|p| *p == lowered || *p == unleet || (!stem.is_empty() && *p == stem))
}

fn score(candidate: &str, findings: &Findings) -> i32 {
    if findings.common {
        return 0;
    }

    let length = candidate.chars().count() as f64;
    let penalised = (findings.repeats + findings.sequences) as f64;
    let effective = f64::max(length - penalised, 1.0);
    let bits = effective * pool_size(candidate).log2();

    match bits {
        b if b < 28.0 => 0,
        b if b < 36.0 => 1,
        b if b < 60.0 => 2,
        b if b < 80.0 => 3,
        _ => MAX_SCORE,
    }
}
