//! CV document attachment

use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Maximum accepted document size in bytes (10MB)
pub const MAX_DOCUMENT_SIZE: usize = 10 * 1024 * 1024;

/// Document formats the intake API accepts for the CV
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Doc,
    Docx,
}

impl DocumentKind {
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "doc" => Some(Self::Doc),
            "docx" => Some(Self::Docx),
            _ => None,
        }
    }

    pub fn from_media_type(media_type: &str) -> Option<Self> {
        // Ignore parameters such as "; charset=binary"
        let essence = media_type.split(';').next().unwrap_or("").trim();
        match essence.to_ascii_lowercase().as_str() {
            "application/pdf" => Some(Self::Pdf),
            "application/msword" => Some(Self::Doc),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                Some(Self::Docx)
            }
            _ => None,
        }
    }

    pub fn media_type(self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Doc => "application/msword",
            Self::Docx => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Doc => "DOC",
            Self::Docx => "DOCX",
        }
    }
}

#[derive(Debug, Error)]
pub enum AttachmentError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} is not a PDF, DOC or DOCX document")]
    Unsupported(String),

    #[error("{name} is too large ({size} bytes)")]
    TooLarge { name: String, size: u64 },
}

/// A document handed over by the user, owned by the form until submission
#[derive(PartialEq, Eq)]
pub struct DocumentAttachment {
    pub file_name: String,
    pub media_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl DocumentAttachment {
    pub fn new(file_name: impl Into<String>, media_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            media_type,
            bytes,
        }
    }

    /// Read a document from disk, inferring its media type from the extension
    pub async fn load(path: &Path) -> Result<Self, AttachmentError> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let kind = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(DocumentKind::from_extension)
            .ok_or_else(|| AttachmentError::Unsupported(file_name.clone()))?;

        let read_error = |source| AttachmentError::Read {
            path: path.display().to_string(),
            source,
        };

        let size = tokio::fs::metadata(path).await.map_err(read_error)?.len();
        if size > MAX_DOCUMENT_SIZE as u64 {
            return Err(AttachmentError::TooLarge {
                name: file_name,
                size,
            });
        }

        let bytes = tokio::fs::read(path).await.map_err(read_error)?;

        tracing::debug!("Loaded {} ({} bytes)", file_name, bytes.len());

        Ok(Self::new(file_name, Some(kind.media_type().to_string()), bytes))
    }

    /// Detected format: the declared media type wins, the extension is the fallback
    pub fn kind(&self) -> Option<DocumentKind> {
        self.media_type
            .as_deref()
            .and_then(DocumentKind::from_media_type)
            .or_else(|| {
                Path::new(&self.file_name)
                    .extension()
                    .and_then(|e| e.to_str())
                    .and_then(DocumentKind::from_extension)
            })
    }

    pub fn is_accepted(&self) -> bool {
        self.kind().is_some()
    }

    /// Media type to declare on the multipart part
    pub fn effective_media_type(&self) -> &str {
        match (self.kind(), self.media_type.as_deref()) {
            (Some(kind), _) => kind.media_type(),
            (None, Some(declared)) => declared,
            (None, None) => "application/octet-stream",
        }
    }

    /// Short description for display
    pub fn summary(&self) -> String {
        let kb = self.bytes.len().div_ceil(1024);
        match self.kind() {
            Some(kind) => format!("{} ({}, {} KB)", self.file_name, kind.label(), kb),
            None => format!("{} ({} KB)", self.file_name, kb),
        }
    }
}

impl fmt::Debug for DocumentAttachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentAttachment")
            .field("file_name", &self.file_name)
            .field("media_type", &self.media_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}
