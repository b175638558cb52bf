//! Resume Parser — plain text out of an uploaded PDF or DOCX.

use std::io::Write;

use bytes::Bytes;
use thiserror::Error;
use tracing::{info, warn};

/// A file received from the client.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Bytes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeFormat {
    Pdf,
    Docx,
}

impl ResumeFormat {
    /// Detects the format from the file name suffix. Case-sensitive.
    pub fn from_file_name(name: &str) -> Option<Self> {
        if name.ends_with(".pdf") {
            Some(ResumeFormat::Pdf)
        } else if name.ends_with(".docx") {
            Some(ResumeFormat::Docx)
        } else {
            None
        }
    }
}

#[derive(Debug, Error)]
pub enum ResumeParseError {
    #[error("Error processing resume file: Unsupported file format. Please upload a PDF or DOCX file.")]
    UnsupportedFormat,

    #[error("Error processing resume file: {0}")]
    Processing(String),
}

/// Extracts resume text. Decoding runs on the blocking pool; a decoder panic on
/// a malformed document is reported as a processing error.
pub async fn parse_resume(file: &UploadedFile) -> Result<String, ResumeParseError> {
    let Some(format) = ResumeFormat::from_file_name(&file.name) else {
        warn!(file_name = %file.name, "Rejected resume with unsupported extension");
        return Err(ResumeParseError::UnsupportedFormat);
    };

    info!(file_name = %file.name, ?format, size = file.bytes.len(), "Parsing resume");

    let bytes = file.bytes.clone();
    tokio::task::spawn_blocking(move || match format {
        ResumeFormat::Pdf => extract_pdf_text(&bytes),
        ResumeFormat::Docx => extract_docx_text(&bytes),
    })
    .await
    .map_err(|e| ResumeParseError::Processing(format!("decoder aborted: {e}")))?
}

/// Writes the bytes to a uniquely named temp file and joins page text in page
/// order. The file is removed when `tmp` drops, on success or error.
fn extract_pdf_text(bytes: &[u8]) -> Result<String, ResumeParseError> {
    let mut tmp = tempfile::Builder::new()
        .prefix("resume-")
        .suffix(".pdf")
        .tempfile()
        .map_err(processing)?;
    tmp.write_all(bytes).map_err(processing)?;
    tmp.flush().map_err(processing)?;

    let pages = pdf_extract::extract_text_by_pages(tmp.path()).map_err(processing)?;
    Ok(pages.join(" "))
}

/// Joins top-level paragraph text in document order.
fn extract_docx_text(bytes: &[u8]) -> Result<String, ResumeParseError> {
    let docx = docx_rs::read_docx(bytes).map_err(processing)?;

    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            docx_rs::DocumentChild::Paragraph(p) => Some(paragraph_text(p)),
            _ => None,
        })
        .collect();

    Ok(paragraphs.join(" "))
}

fn paragraph_text(paragraph: &docx_rs::Paragraph) -> String {
    let mut text = String::new();
    for child in &paragraph.children {
        if let docx_rs::ParagraphChild::Run(run) = child {
            for run_child in &run.children {
                if let docx_rs::RunChild::Text(t) = run_child {
                    text.push_str(&t.text);
                }
            }
        }
    }
    text
}

fn processing<E: std::fmt::Display>(e: E) -> ResumeParseError {
    ResumeParseError::Processing(e.to_string())
}
