//! Prompt chains: render a template, call the text generator, parse the reply.
//!
//! Every chain has the same shape, `Chain<P: OutputParser>`. The parser decides
//! the output type, so adding an extraction task means adding a template and
//! picking one of the three parsers below.

use std::marker::PhantomData;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::llm_client::prompts::{COMMA_LIST_SYSTEM, JSON_ONLY_SYSTEM, PLAIN_TEXT_SYSTEM};
use crate::llm_client::{strip_json_fences, LlmError, TextGenerator};

pub mod models;
pub mod prompts;

use models::{ExperienceDetails, QaItem};

#[derive(Debug, Error)]
#[error("{0}")]
pub struct ParseError(pub String);

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("{chain} chain: {source}")]
    Llm {
        chain: &'static str,
        #[source]
        source: LlmError,
    },

    #[error("{chain} chain returned unparseable output: {source}")]
    Parse {
        chain: &'static str,
        #[source]
        source: ParseError,
    },
}

/// Turns raw model text into a typed value.
pub trait OutputParser: Send + Sync {
    type Output;

    fn parse(&self, text: &str) -> Result<Self::Output, ParseError>;

    /// System prompt that steers the model toward this parser's format.
    fn system_prompt(&self) -> &'static str;
}

/// Splits on commas, trims each item and drops empty ones.
#[derive(Debug, Default, Clone, Copy)]
pub struct CommaListParser;

impl OutputParser for CommaListParser {
    type Output = Vec<String>;

    fn parse(&self, text: &str) -> Result<Vec<String>, ParseError> {
        Ok(text
            .trim()
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(String::from)
            .collect())
    }

    fn system_prompt(&self) -> &'static str {
        COMMA_LIST_SYSTEM
    }
}

/// Deserializes JSON, tolerating markdown code fences around it.
pub struct JsonParser<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonParser<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for JsonParser<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: DeserializeOwned> OutputParser for JsonParser<T> {
    type Output = T;

    fn parse(&self, text: &str) -> Result<T, ParseError> {
        serde_json::from_str(strip_json_fences(text)).map_err(|e| ParseError(e.to_string()))
    }

    fn system_prompt(&self) -> &'static str {
        JSON_ONLY_SYSTEM
    }
}

/// Returns the reply as-is, minus surrounding whitespace.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextParser;

impl OutputParser for TextParser {
    type Output = String;

    fn parse(&self, text: &str) -> Result<String, ParseError> {
        Ok(text.trim().to_string())
    }

    fn system_prompt(&self) -> &'static str {
        PLAIN_TEXT_SYSTEM
    }
}

/// Template + external call + parser.
pub struct Chain<P> {
    name: &'static str,
    template: &'static str,
    parser: P,
}

impl<P: OutputParser> Chain<P> {
    pub fn new(name: &'static str, template: &'static str, parser: P) -> Self {
        Self {
            name,
            template,
            parser,
        }
    }

    pub fn render(&self, vars: &[(&str, &str)]) -> String {
        render(self.template, vars)
    }

    /// Renders the template, makes exactly one generator call and parses the reply.
    pub async fn invoke(
        &self,
        llm: &dyn TextGenerator,
        vars: &[(&str, &str)],
    ) -> Result<P::Output, ChainError> {
        let prompt = self.render(vars);
        debug!(chain = self.name, prompt_len = prompt.len(), "Invoking chain");

        let text = llm
            .generate(&prompt, self.parser.system_prompt())
            .await
            .map_err(|source| ChainError::Llm {
                chain: self.name,
                source,
            })?;

        self.parser.parse(&text).map_err(|source| ChainError::Parse {
            chain: self.name,
            source,
        })
    }
}

/// Substitutes `{name}` placeholders in a single pass. Unknown placeholders are
/// left untouched, and substituted values are never re-scanned.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    let re = PLACEHOLDER.get_or_init(|| Regex::new(r"\{([a-z_]+)\}").expect("valid regex"));

    re.replace_all(template, |caps: &Captures| {
        let key = &caps[1];
        vars.iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value.to_string())
            .unwrap_or_else(|| caps[0].to_string())
    })
    .into_owned()
}

/// The six chains the interview session runs.
pub struct Chains {
    pub skills: Chain<CommaListParser>,
    pub qa: Chain<JsonParser<Vec<QaItem>>>,
    pub experience: Chain<TextParser>,
    pub resume_keywords: Chain<CommaListParser>,
    pub details: Chain<JsonParser<ExperienceDetails>>,
    pub suggestions: Chain<JsonParser<Vec<String>>>,
}

impl Chains {
    pub fn new() -> Self {
        Self {
            skills: Chain::new("skills", prompts::SKILLS_PROMPT, CommaListParser),
            qa: Chain::new("qa", prompts::QA_PROMPT, JsonParser::new()),
            experience: Chain::new("experience", prompts::EXPERIENCE_PROMPT, TextParser),
            resume_keywords: Chain::new(
                "resume_keywords",
                prompts::RESUME_KEYWORDS_PROMPT,
                CommaListParser,
            ),
            details: Chain::new("details", prompts::DETAILS_PROMPT, JsonParser::new()),
            suggestions: Chain::new(
                "suggestions",
                prompts::SUGGESTIONS_PROMPT,
                JsonParser::new(),
            ),
        }
    }
}

impl Default for Chains {
    fn default() -> Self {
        Self::new()
    }
}
