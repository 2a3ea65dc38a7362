//! Resume text extraction — turns an uploaded PDF, DOCX, or TXT file into plain text.
//!
//! All functions here are synchronous and CPU-bound; handlers run them on the
//! blocking pool.

use std::path::Path;

use thiserror::Error;

pub mod docx;

/// Upload formats the checker can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeFormat {
    Pdf,
    Docx,
    Txt,
}

impl ResumeFormat {
    /// Detects the format from the file name's extension (case-insensitive).
    pub fn from_file_name(file_name: &str) -> Result<Self, ExtractError> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => Ok(ResumeFormat::Pdf),
            "docx" => Ok(ResumeFormat::Docx),
            "txt" => Ok(ResumeFormat::Txt),
            _ => Err(ExtractError::UnsupportedFormat(extension)),
        }
    }
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsupported file format '{0}'. Please upload PDF, DOCX, or TXT files only.")]
    UnsupportedFormat(String),

    #[error("Error extracting PDF: {0}")]
    Pdf(String),

    #[error("Error extracting DOCX: {0}")]
    Docx(String),

    #[error("Text file is not valid UTF-8")]
    InvalidUtf8,

    #[error("No readable text found in the resume. Image-based PDFs are not supported.")]
    NoText,
}

/// Extracts the text of a resume file. The result is trimmed and never empty.
pub fn extract_resume_text(file_name: &str, bytes: &[u8]) -> Result<String, ExtractError> {
    let text = match ResumeFormat::from_file_name(file_name)? {
        ResumeFormat::Pdf => extract_pdf(bytes)?,
        ResumeFormat::Docx => docx::extract_docx(bytes)?,
        ResumeFormat::Txt => {
            String::from_utf8(bytes.to_vec()).map_err(|_| ExtractError::InvalidUtf8)?
        }
    };

    let text = normalize_whitespace(&text);
    if text.is_empty() {
        return Err(ExtractError::NoText);
    }
    Ok(text)
}

fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractError> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractError::Pdf(e.to_string()))
}

/// Trims each line and collapses runs of blank lines into a single blank line.
fn normalize_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank_run = 0;

    for line in text.lines().map(str::trim_end) {
        if line.trim().is_empty() {
            blank_run += 1;
            continue;
        }
        if !out.is_empty() {
            out.push_str(if blank_run > 0 { "\n\n" } else { "\n" });
        }
        out.push_str(line);
        blank_run = 0;
    }

    out
}
