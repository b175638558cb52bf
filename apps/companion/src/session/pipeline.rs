//! Orchestrator — runs one interview-prep session from JD and resume to Q&A.
//!
//! The flow is strictly sequential. Preconditions fail the request before any
//! external call; a skills-extraction failure fails the request; anything that
//! goes wrong in the resume stage is reported as a notice and stops the run
//! while keeping what was already produced.

use thiserror::Error;
use tracing::{info, warn};

use crate::chains::prompts::NO_EXPERIENCE_SENTINEL;
use crate::chains::{ChainError, Chains};
use crate::errors::AppError;
use crate::jd::clean_job_description;
use crate::keywords::{find_missing_keywords, MatchMode};
use crate::llm_client::TextGenerator;
use crate::resume::parser::{parse_resume, ResumeParseError, UploadedFile};
use crate::resume::store::ResumeStore;
use crate::session::report::{NoticeLevel, SessionReport, SkillSuggestions};

/// Raw form input for one session.
#[derive(Debug, Clone, Default)]
pub struct SessionInput {
    pub job_description: String,
    pub user_id: String,
    pub resume: Option<UploadedFile>,
}

/// Collaborators the session runs against.
#[derive(Clone, Copy)]
pub struct SessionDeps<'a> {
    pub llm: &'a dyn TextGenerator,
    pub chains: &'a Chains,
    pub store: &'a ResumeStore,
    pub match_mode: MatchMode,
}

#[derive(Debug, Error)]
enum StageError {
    #[error(transparent)]
    Parse(#[from] ResumeParseError),

    #[error(transparent)]
    Chain(#[from] ChainError),
}

/// Checks the form in order and returns the first missing precondition.
pub fn validate(input: &SessionInput) -> Result<&UploadedFile, AppError> {
    if input.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "Please enter a job description.".to_string(),
        ));
    }
    let Some(resume) = input.resume.as_ref() else {
        return Err(AppError::Validation("Please upload a resume.".to_string()));
    };
    if input.user_id.trim().is_empty() {
        return Err(AppError::Validation(
            "Please enter a valid User ID.".to_string(),
        ));
    }
    Ok(resume)
}

pub async fn run_session(
    deps: SessionDeps<'_>,
    input: &SessionInput,
) -> Result<SessionReport, AppError> {
    let resume = validate(input)?;

    let cleaned = clean_job_description(&input.job_description);
    info!(chars = cleaned.len(), "Extracting skills from JD");
    let skills = deps
        .chains
        .skills
        .invoke(deps.llm, &[("description", cleaned.as_str())])
        .await
        .map_err(|e| {
            AppError::Llm(format!(
                "Failed to extract skills from the job description: {e}"
            ))
        })?;
    info!(count = skills.len(), "JD skills extracted");

    let mut report = SessionReport::new(cleaned, skills);

    if let Err(e) = resume_stage(deps, &input.user_id, resume, &mut report).await {
        warn!("Resume stage failed: {e}");
        report.halt(NoticeLevel::Error, format!("Error processing resume: {e}"));
    }

    Ok(report)
}

async fn resume_stage(
    deps: SessionDeps<'_>,
    user_id: &str,
    resume: &UploadedFile,
    report: &mut SessionReport,
) -> Result<(), StageError> {
    let resume_text = parse_resume(resume).await?;

    let experience_text = deps
        .chains
        .experience
        .invoke(deps.llm, &[("resume_text", resume_text.as_str())])
        .await?;

    if experience_text == NO_EXPERIENCE_SENTINEL {
        warn!(user_id, "No experience section found in resume");
        report.halt(
            NoticeLevel::Warning,
            "No professional experience section found in the resume.",
        );
        return Ok(());
    }

    match deps
        .store
        .store(user_id, &experience_text, &resume.name)
        .await
    {
        Ok(()) => report.push(
            NoticeLevel::Success,
            format!("Resume experience stored for user {user_id}!"),
        ),
        Err(e) => {
            tracing::error!("Failed to store resume for {user_id}: {e}");
            report.push(
                NoticeLevel::Error,
                format!("Error storing resume in database: {e}"),
            );
        }
    }

    let resume_keywords = deps
        .chains
        .resume_keywords
        .invoke(deps.llm, &[("experience_text", experience_text.as_str())])
        .await?;
    report.resume_keywords = resume_keywords;

    report.missing_keywords =
        find_missing_keywords(&report.jd_keywords, &report.resume_keywords, deps.match_mode);
    info!(
        missing = report.missing_keywords.len(),
        mode = %deps.match_mode,
        "Compared JD skills against resume keywords"
    );

    if report.missing_keywords.is_empty() {
        report.push(
            NoticeLevel::Info,
            "No missing keywords-all JD skills are covered in resume experience.",
        );
    } else {
        suggest_improvements(deps, &experience_text, report).await?;
    }

    generate_qa(deps, report).await;

    Ok(())
}

async fn suggest_improvements(
    deps: SessionDeps<'_>,
    experience_text: &str,
    report: &mut SessionReport,
) -> Result<(), StageError> {
    let details = deps
        .chains
        .details
        .invoke(deps.llm, &[("experience_text", experience_text)])
        .await?;

    let total_years = details.total_years.to_string();
    let periods = details.format_periods();

    let mut suggestions = Vec::with_capacity(report.missing_keywords.len());
    for missing in &report.missing_keywords {
        let bullets = deps
            .chains
            .suggestions
            .invoke(
                deps.llm,
                &[
                    ("experience_text", experience_text),
                    ("domain", details.domain.as_str()),
                    ("total_years", total_years.as_str()),
                    ("periods", periods.as_str()),
                    ("missing_skill", missing.as_str()),
                ],
            )
            .await?;
        suggestions.push(SkillSuggestions {
            skill: missing.clone(),
            bullets,
        });
    }
    report.suggestions = suggestions;
    Ok(())
}

/// Q&A failures degrade to an empty result instead of stopping the session.
async fn generate_qa(deps: SessionDeps<'_>, report: &mut SessionReport) {
    if report.jd_keywords.is_empty() {
        report.push(NoticeLevel::Info, "No skills extracted, so no QA generated.");
        return;
    }

    let skills = report.jd_keywords.join(", ");
    match deps.chains.qa.invoke(deps.llm, &[("skills", skills.as_str())]).await {
        Ok(items) => report.qa = items,
        Err(e) => {
            warn!("Q&A generation failed: {e}");
            report.push(NoticeLevel::Error, format!("Error generating QA: {e}"));
        }
    }

    if report.qa.is_empty() {
        report.push(NoticeLevel::Info, "No QA generated.");
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use std::io::Cursor;

    use super::*;
    use crate::llm_client::testing::ScriptedGenerator;
    use crate::resume::store::tests::{experience_of, temp_store};
    use crate::session::report::{Notice, SessionStatus};

    const SKILLS: &str = "analyzing job descriptions";
    const EXPERIENCE: &str = "parsing resumes";
    const RESUME_KEYWORDS: &str = "analyzing resume experience";
    const DETAILS: &str = "calculate the total years";
    const SUGGESTIONS: &str = "missing skill '";
    const QA: &str = "generate 2 interview questions";

    const JD: &str =
        "Looking for a Python developer with AWS and Docker experience. 5+ years required!";

    fn docx_resume(text: &str) -> UploadedFile {
        let doc = docx_rs::Docx::new()
            .add_paragraph(docx_rs::Paragraph::new().add_run(docx_rs::Run::new().add_text(text)));
        let mut buf: Vec<u8> = Vec::new();
        doc.build().pack(Cursor::new(&mut buf)).unwrap();
        UploadedFile {
            name: "resume.docx".to_string(),
            bytes: Bytes::from(buf),
        }
    }

    fn input(resume: Option<UploadedFile>) -> SessionInput {
        SessionInput {
            job_description: JD.to_string(),
            user_id: "u1".to_string(),
            resume,
        }
    }

    fn happy_generator() -> ScriptedGenerator {
        ScriptedGenerator::new()
            .on(SKILLS, "Python, AWS, Docker")
            .on(EXPERIENCE, "Software Engineer at Acme 2018-2023, built Python services on Docker")
            .on(RESUME_KEYWORDS, "python, docker, flask")
            .on(DETAILS, r#"{"total_years": 5, "domain": "tech", "periods": [["2018", "2023"]]}"#)
            .on(SUGGESTIONS, r#"["Migrated Acme services to AWS ECS", "Automated AWS deploys"]"#)
            .on(
                QA,
                r#"[{"skill": "Python", "question": "What is a generator?", "answer": "A lazy iterator."},
                    {"skill": "AWS", "question": "What is IAM?", "answer": "Identity and access management."}]"#,
            )
    }

    fn has_notice(notices: &[Notice], level: NoticeLevel, needle: &str) -> bool {
        notices
            .iter()
            .any(|n| n.level == level && n.message.contains(needle))
    }

    #[tokio::test]
    async fn test_full_session() {
        let (store, _dir) = temp_store().await;
        let llm = happy_generator();
        let chains = Chains::new();
        let deps = SessionDeps {
            llm: &llm,
            chains: &chains,
            store: &store,
            match_mode: MatchMode::Phrase,
        };

        let report = run_session(deps, &input(Some(docx_resume("Acme 2018-2023"))))
            .await
            .unwrap();

        assert_eq!(report.status, SessionStatus::Completed);
        assert_eq!(
            report.cleaned_job_description,
            "looking for a python developer with aws and docker experience years required"
        );
        assert_eq!(report.jd_keywords, vec!["Python", "AWS", "Docker"]);
        assert_eq!(report.resume_keywords, vec!["python", "docker", "flask"]);
        assert_eq!(report.missing_keywords, vec!["aws"]);
        assert_eq!(report.suggestions.len(), 1);
        assert_eq!(report.suggestions[0].skill, "aws");
        assert_eq!(report.suggestions[0].bullets.len(), 2);
        assert_eq!(report.qa.len(), 2);
        assert!(has_notice(&report.notices, NoticeLevel::Success, "stored for user u1"));

        assert_eq!(
            experience_of(&store, "u1").await.as_deref(),
            Some("Software Engineer at Acme 2018-2023, built Python services on Docker")
        );

        let suggestion_prompts = llm.prompts_matching(SUGGESTIONS);
        assert_eq!(suggestion_prompts.len(), 1);
        assert!(suggestion_prompts[0].contains("domain: tech"));
        assert!(suggestion_prompts[0].contains("total years: 5"));
        assert!(suggestion_prompts[0].contains("[(2018, 2023)]"));
        assert!(suggestion_prompts[0].contains("'aws'"));

        let skills_prompts = llm.prompts_matching(SKILLS);
        assert!(skills_prompts[0].contains(&report.cleaned_job_description));
        let qa_prompts = llm.prompts_matching(QA);
        assert!(qa_prompts[0].contains("Python, AWS, Docker"));
    }

    #[tokio::test]
    async fn test_store_failure_is_reported_and_flow_continues() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("resumes.db").display());
        let pool = crate::db::create_pool(&url).await.unwrap();
        sqlx::query("DROP TABLE resumes").execute(&pool).await.unwrap();
        let store = ResumeStore::new(pool);

        let llm = happy_generator();
        let chains = Chains::new();
        let deps = SessionDeps {
            llm: &llm,
            chains: &chains,
            store: &store,
            match_mode: MatchMode::Phrase,
        };

        let report = run_session(deps, &input(Some(docx_resume("Acme 2018-2023"))))
            .await
            .unwrap();

        assert_eq!(report.status, SessionStatus::Completed);
        assert!(has_notice(
            &report.notices,
            NoticeLevel::Error,
            "Error storing resume in database:"
        ));
        assert!(!has_notice(&report.notices, NoticeLevel::Success, "stored for user"));
        assert_eq!(report.resume_keywords, vec!["python", "docker", "flask"]);
        assert_eq!(report.missing_keywords, vec!["aws"]);
        assert_eq!(report.suggestions.len(), 1);
        assert_eq!(report.qa.len(), 2);
        assert_eq!(llm.calls_matching(RESUME_KEYWORDS), 1);
        assert_eq!(llm.calls_matching(DETAILS), 1);
        assert_eq!(llm.calls_matching(SUGGESTIONS), 1);
        assert_eq!(llm.calls_matching(QA), 1);
    }

    #[tokio::test]
    async fn test_one_suggestion_call_per_missing_keyword() {
        let (store, _dir) = temp_store().await;
        let llm = ScriptedGenerator::new()
            .on(SKILLS, "Kafka, Terraform, Rust")
            .on(EXPERIENCE, "Engineer at Beta 2020-Present")
            .on(RESUME_KEYWORDS, "Go")
            .on(DETAILS, "{}")
            .on(SUGGESTIONS, r#"["bullet"]"#)
            .on(QA, "[]");
        let chains = Chains::new();
        let deps = SessionDeps {
            llm: &llm,
            chains: &chains,
            store: &store,
            match_mode: MatchMode::Phrase,
        };

        let report = run_session(deps, &input(Some(docx_resume("Beta")))).await.unwrap();

        assert_eq!(report.missing_keywords, vec!["kafka", "rust", "terraform"]);
        assert_eq!(llm.calls_matching(SUGGESTIONS), 3);
        let skills: Vec<_> = report.suggestions.iter().map(|s| s.skill.as_str()).collect();
        assert_eq!(skills, vec!["kafka", "rust", "terraform"]);
        // Defaults from an empty details object reach the prompt.
        assert!(llm.prompts_matching(SUGGESTIONS)[0].contains("domain: Unknown"));
        assert!(has_notice(&report.notices, NoticeLevel::Info, "No QA generated."));
    }

    #[tokio::test]
    async fn test_sentinel_short_circuits_downstream_steps() {
        let (store, _dir) = temp_store().await;
        let llm = ScriptedGenerator::new()
            .on(SKILLS, "Python")
            .on(EXPERIENCE, "No experience section found");
        let chains = Chains::new();
        let deps = SessionDeps {
            llm: &llm,
            chains: &chains,
            store: &store,
            match_mode: MatchMode::Phrase,
        };

        let report = run_session(deps, &input(Some(docx_resume("Education only"))))
            .await
            .unwrap();

        assert_eq!(report.status, SessionStatus::Halted);
        assert!(has_notice(
            &report.notices,
            NoticeLevel::Warning,
            "No professional experience section found"
        ));
        assert_eq!(llm.calls_matching(RESUME_KEYWORDS), 0);
        assert_eq!(llm.calls_matching(DETAILS), 0);
        assert_eq!(llm.calls_matching(SUGGESTIONS), 0);
        assert_eq!(llm.calls_matching(QA), 0);
        assert!(store.retrieve("u1").await.unwrap().is_none());
        assert_eq!(report.jd_keywords, vec!["Python"]);
    }

    #[tokio::test]
    async fn test_preconditions_halt_before_any_call() {
        let (store, _dir) = temp_store().await;
        let llm = happy_generator();
        let chains = Chains::new();
        let deps = SessionDeps {
            llm: &llm,
            chains: &chains,
            store: &store,
            match_mode: MatchMode::Phrase,
        };

        let cases = [
            (
                SessionInput {
                    job_description: "   ".to_string(),
                    user_id: "u1".to_string(),
                    resume: Some(docx_resume("x")),
                },
                "Please enter a job description.",
            ),
            (input(None), "Please upload a resume."),
            (
                SessionInput {
                    user_id: " \t".to_string(),
                    ..input(Some(docx_resume("x")))
                },
                "Please enter a valid User ID.",
            ),
        ];

        for (case, expected) in cases {
            let err = run_session(deps, &case).await.unwrap_err();
            match err {
                AppError::Validation(msg) => assert_eq!(msg, expected),
                other => panic!("expected validation error, got {other:?}"),
            }
        }
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_skills_failure_fails_the_request() {
        let (store, _dir) = temp_store().await;
        let llm = ScriptedGenerator::new().fail_on(SKILLS);
        let chains = Chains::new();
        let deps = SessionDeps {
            llm: &llm,
            chains: &chains,
            store: &store,
            match_mode: MatchMode::Phrase,
        };

        let err = run_session(deps, &input(Some(docx_resume("x")))).await.unwrap_err();
        assert!(matches!(err, AppError::Llm(_)));
        assert_eq!(llm.calls(), 1);
    }

    #[tokio::test]
    async fn test_unsupported_file_keeps_jd_keywords() {
        let (store, _dir) = temp_store().await;
        let llm = happy_generator();
        let chains = Chains::new();
        let deps = SessionDeps {
            llm: &llm,
            chains: &chains,
            store: &store,
            match_mode: MatchMode::Phrase,
        };
        let resume = UploadedFile {
            name: "resume.txt".to_string(),
            bytes: Bytes::from_static(b"plain text resume"),
        };

        let report = run_session(deps, &input(Some(resume))).await.unwrap();

        assert_eq!(report.status, SessionStatus::Halted);
        assert_eq!(report.jd_keywords, vec!["Python", "AWS", "Docker"]);
        assert!(has_notice(
            &report.notices,
            NoticeLevel::Error,
            "Unsupported file format"
        ));
        assert_eq!(llm.calls_matching(EXPERIENCE), 0);
    }

    #[tokio::test]
    async fn test_qa_failure_degrades_to_empty() {
        let (store, _dir) = temp_store().await;
        let llm = ScriptedGenerator::new()
            .on(SKILLS, "Python")
            .on(EXPERIENCE, "Python developer at Acme")
            .on(RESUME_KEYWORDS, "Python")
            .fail_on(QA);
        let chains = Chains::new();
        let deps = SessionDeps {
            llm: &llm,
            chains: &chains,
            store: &store,
            match_mode: MatchMode::Phrase,
        };

        let report = run_session(deps, &input(Some(docx_resume("x")))).await.unwrap();

        assert_eq!(report.status, SessionStatus::Completed);
        assert!(report.qa.is_empty());
        assert!(report.missing_keywords.is_empty());
        assert!(has_notice(&report.notices, NoticeLevel::Info, "No missing keywords"));
        assert!(has_notice(&report.notices, NoticeLevel::Error, "Error generating QA"));
        assert!(has_notice(&report.notices, NoticeLevel::Info, "No QA generated."));
        assert_eq!(llm.calls_matching(DETAILS), 0);
    }

    #[tokio::test]
    async fn test_no_skills_skips_qa() {
        let (store, _dir) = temp_store().await;
        let llm = ScriptedGenerator::new()
            .on(SKILLS, "  ")
            .on(EXPERIENCE, "Engineer at Acme")
            .on(RESUME_KEYWORDS, "Rust");
        let chains = Chains::new();
        let deps = SessionDeps {
            llm: &llm,
            chains: &chains,
            store: &store,
            match_mode: MatchMode::Phrase,
        };

        let report = run_session(deps, &input(Some(docx_resume("x")))).await.unwrap();

        assert!(report.jd_keywords.is_empty());
        assert!(has_notice(
            &report.notices,
            NoticeLevel::Info,
            "No skills extracted, so no QA generated."
        ));
        assert_eq!(llm.calls_matching(QA), 0);
    }

    #[tokio::test]
    async fn test_details_failure_halts_with_error_notice() {
        let (store, _dir) = temp_store().await;
        let llm = ScriptedGenerator::new()
            .on(SKILLS, "Python, Kafka")
            .on(EXPERIENCE, "Engineer at Acme")
            .on(RESUME_KEYWORDS, "Python")
            .on(DETAILS, "I could not determine that.");
        let chains = Chains::new();
        let deps = SessionDeps {
            llm: &llm,
            chains: &chains,
            store: &store,
            match_mode: MatchMode::Phrase,
        };

        let report = run_session(deps, &input(Some(docx_resume("x")))).await.unwrap();

        assert_eq!(report.status, SessionStatus::Halted);
        assert_eq!(report.missing_keywords, vec!["kafka"]);
        assert!(report.suggestions.is_empty());
        assert!(has_notice(&report.notices, NoticeLevel::Error, "Error processing resume"));
        assert_eq!(llm.calls_matching(QA), 0);
        // The experience was stored before the failure.
        assert!(store.retrieve("u1").await.unwrap().is_some());
    }
}
