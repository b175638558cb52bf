//! Keyword Differ — which JD skills are absent from the resume keywords.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How resume keywords are turned into the comparison set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Each resume keyword is compared as a whole phrase.
    #[default]
    Phrase,
    /// Each resume keyword is split into words; multi-word JD skills never match.
    Word,
}

#[derive(Debug, Error)]
#[error("unknown keyword match mode '{0}', expected 'phrase' or 'word'")]
pub struct UnknownMatchMode(String);

impl FromStr for MatchMode {
    type Err = UnknownMatchMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "phrase" => Ok(MatchMode::Phrase),
            "word" => Ok(MatchMode::Word),
            other => Err(UnknownMatchMode(other.to_string())),
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchMode::Phrase => f.write_str("phrase"),
            MatchMode::Word => f.write_str("word"),
        }
    }
}

/// Returns the lower-cased JD skills missing from the resume keywords, sorted.
pub fn find_missing_keywords(
    jd_skills: &[String],
    resume_keywords: &[String],
    mode: MatchMode,
) -> Vec<String> {
    let jd_set: BTreeSet<String> = jd_skills.iter().map(|s| s.to_lowercase()).collect();

    let resume_set: BTreeSet<String> = match mode {
        MatchMode::Phrase => resume_keywords.iter().map(|k| k.to_lowercase()).collect(),
        MatchMode::Word => resume_keywords
            .iter()
            .flat_map(|k| k.split_whitespace())
            .map(str::to_lowercase)
            .collect(),
    };

    jd_set.difference(&resume_set).cloned().collect()
}
