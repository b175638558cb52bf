//! What one interview-prep session hands back to the caller.

use serde::Serialize;

use crate::chains::models::QaItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Warning,
    Success,
    Info,
    Error,
}

/// A user-facing message, in the order it was emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Completed,
    Halted,
}

/// Suggested resume bullets for one missing skill.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillSuggestions {
    pub skill: String,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub status: SessionStatus,
    pub cleaned_job_description: String,
    pub jd_keywords: Vec<String>,
    pub resume_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub suggestions: Vec<SkillSuggestions>,
    pub qa: Vec<QaItem>,
    pub notices: Vec<Notice>,
}

impl SessionReport {
    pub fn new(cleaned_job_description: String, jd_keywords: Vec<String>) -> Self {
        Self {
            status: SessionStatus::Completed,
            cleaned_job_description,
            jd_keywords,
            resume_keywords: Vec::new(),
            missing_keywords: Vec::new(),
            suggestions: Vec::new(),
            qa: Vec::new(),
            notices: Vec::new(),
        }
    }

    pub fn push(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.notices.push(Notice {
            level,
            message: message.into(),
        });
    }

    /// Records a warning or error and marks the session as stopped early.
    pub fn halt(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.push(level, message);
        self.status = SessionStatus::Halted;
    }
}
