//! Admin document upload: multipart parsing and client-side validation.
//!
//! Files are checked here before anything is sent to the backend: only PDFs
//! up to the configured size limit get through.

use actix_multipart::Multipart;
use futures_util::StreamExt;
use thiserror::Error;

use crate::services::backend::UploadDocument;

/// Document categories accepted by the backend, with their display labels.
pub const CATEGORIES: &[(&str, &str)] = &[
    ("general", "General"),
    ("urbanisme", "Urban planning"),
    ("edificacio", "Building"),
    ("medi_ambient", "Environment"),
    ("accessibilitat", "Accessibility"),
    ("seguretat", "Safety"),
];

pub const DEFAULT_CATEGORY: &str = "general";

const KB: usize = 1024;
const MB: usize = 1024 * 1024;

/// Human-readable size limit, e.g. `10 MB`, `1.5 MB` or `512 KB`.
///
/// Rounds up so a limit never reads smaller than it is.
pub fn size_label(bytes: usize) -> String {
    if bytes < MB {
        format!("{} KB", bytes.div_ceil(KB))
    } else if bytes % MB == 0 {
        format!("{} MB", bytes / MB)
    } else {
        let tenths = (bytes * 10).div_ceil(MB);
        format!("{}.{} MB", tenths / 10, tenths % 10)
    }
}

/// Text fields longer than this are rejected.
const MAX_TEXT_FIELD_BYTES: usize = 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("Please select a PDF file to upload")]
    MissingFile,

    #[error("The selected file is empty")]
    EmptyFile,

    #[error("Only PDF files are accepted")]
    NotPdf,

    #[error("The file is larger than the {} limit", size_label(*.max_bytes))]
    TooLarge { max_bytes: usize },

    #[error("Unknown category: {0}")]
    InvalidCategory(String),

    #[error("Malformed upload: {0}")]
    Malformed(String),
}

/// A file received from the browser.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Fields of the upload form.
#[derive(Debug, Clone, Default)]
pub struct UploadForm {
    pub file: Option<UploadedFile>,
    pub title: String,
    pub category: String,
}

/// Whether the file is a PDF, judged by content type or extension.
pub fn is_pdf(filename: &str, content_type: Option<&str>) -> bool {
    let by_type = content_type
        .map(|ct| {
            ct.split(';')
                .next()
                .unwrap_or("")
                .trim()
                .eq_ignore_ascii_case("application/pdf")
        })
        .unwrap_or(false);
    by_type || filename.to_ascii_lowercase().ends_with(".pdf")
}

/// Rejects empty, non-PDF and oversized files.
pub fn validate_upload(
    filename: &str,
    content_type: Option<&str>,
    size: usize,
    max_bytes: usize,
) -> Result<(), UploadError> {
    if !is_pdf(filename, content_type) {
        return Err(UploadError::NotPdf);
    }
    if size == 0 {
        return Err(UploadError::EmptyFile);
    }
    if size > max_bytes {
        return Err(UploadError::TooLarge { max_bytes });
    }
    Ok(())
}

pub fn is_known_category(category: &str) -> bool {
    CATEGORIES.iter().any(|(id, _)| *id == category)
}

/// Title used when the form leaves it blank: the file name without extension.
fn title_from_filename(filename: &str) -> String {
    let name = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => name.to_string(),
    }
}

impl UploadForm {
    /// Validates the form and builds the document to forward.
    pub fn into_document(self, max_bytes: usize) -> Result<UploadDocument, UploadError> {
        let file = self.file.ok_or(UploadError::MissingFile)?;
        validate_upload(
            &file.filename,
            file.content_type.as_deref(),
            file.bytes.len(),
            max_bytes,
        )?;

        let category = match self.category.trim() {
            "" => DEFAULT_CATEGORY.to_string(),
            c if is_known_category(c) => c.to_string(),
            c => return Err(UploadError::InvalidCategory(c.to_string())),
        };

        let title = match self.title.trim() {
            "" => title_from_filename(&file.filename),
            t => t.to_string(),
        };

        Ok(UploadDocument {
            filename: file.filename,
            bytes: file.bytes,
            title,
            category,
        })
    }
}

/// Reads the upload form from a multipart stream.
///
/// The file is buffered in memory; reading stops with
/// [`UploadError::TooLarge`] as soon as it grows past `max_bytes`.
pub async fn read_upload_form(
    mut payload: Multipart,
    max_bytes: usize,
) -> Result<UploadForm, UploadError> {
    let mut form = UploadForm::default();

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| UploadError::Malformed(e.to_string()))?;
        let name = field.name().to_string();

        match name.as_str() {
            "file" => {
                let filename = field
                    .content_disposition()
                    .get_filename()
                    .unwrap_or("")
                    .to_string();
                let content_type = field.content_type().map(|m| m.essence_str().to_string());

                let mut bytes = Vec::new();
                while let Some(chunk) = field.next().await {
                    let chunk = chunk.map_err(|e| UploadError::Malformed(e.to_string()))?;
                    if bytes.len() + chunk.len() > max_bytes {
                        return Err(UploadError::TooLarge { max_bytes });
                    }
                    bytes.extend_from_slice(&chunk);
                }

                // Browsers send an empty, unnamed part when no file was chosen
                if filename.is_empty() && bytes.is_empty() {
                    continue;
                }

                form.file = Some(UploadedFile {
                    filename,
                    content_type,
                    bytes,
                });
            }
            "title" | "category" => {
                let mut value = Vec::new();
                while let Some(chunk) = field.next().await {
                    let chunk = chunk.map_err(|e| UploadError::Malformed(e.to_string()))?;
                    if value.len() + chunk.len() > MAX_TEXT_FIELD_BYTES {
                        return Err(UploadError::Malformed(format!("field {} too long", name)));
                    }
                    value.extend_from_slice(&chunk);
                }
                let value = String::from_utf8(value)
                    .map_err(|_| UploadError::Malformed(format!("field {} is not UTF-8", name)))?;
                if name == "title" {
                    form.title = value;
                } else {
                    form.category = value;
                }
            }
            _ => {
                while let Some(chunk) = field.next().await {
                    chunk.map_err(|e| UploadError::Malformed(e.to_string()))?;
                }
            }
        }
    }

    Ok(form)
}
