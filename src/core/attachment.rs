//! The single pending image attachment held by the input form.
//!
//! Selection only records the path and declared MIME type. The bytes are read
//! and base64-encoded when the turn is submitted, so a file that disappears in
//! between surfaces as a relay failure rather than at selection time.

use std::error::Error as StdError;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use base64::Engine as _;

use crate::api::InlineData;
use crate::core::config::data::path_display;
use crate::core::message::ImageRef;

const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// Declared MIME type for a file, derived from its extension.
///
/// Contents are not sniffed and non-image extensions are accepted; the model
/// service is the one that decides what it can read.
pub fn mime_type_for_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("heic") => "image/heic",
        Some("heif") => "image/heif",
        Some("bmp") => "image/bmp",
        Some("svg") => "image/svg+xml",
        Some("tif") | Some("tiff") => "image/tiff",
        _ => FALLBACK_MIME_TYPE,
    }
}

pub fn encode_bytes(bytes: &[u8], mime_type: &str) -> InlineData {
    InlineData {
        mime_type: mime_type.to_string(),
        data: base64::engine::general_purpose::STANDARD.encode(bytes),
    }
}

#[derive(Debug)]
pub enum AttachmentError {
    NotFound { path: PathBuf },
    NotAFile { path: PathBuf },
    Read { path: PathBuf, source: io::Error },
}

impl fmt::Display for AttachmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttachmentError::NotFound { path } => {
                write!(f, "No such file: {}", path_display(path))
            }
            AttachmentError::NotAFile { path } => {
                write!(f, "Not a regular file: {}", path_display(path))
            }
            AttachmentError::Read { path, source } => {
                write!(f, "Failed to read {}: {}", path_display(path), source)
            }
        }
    }
}

impl StdError for AttachmentError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            AttachmentError::Read { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAttachment {
    path: PathBuf,
    mime_type: String,
    size_bytes: u64,
}

impl PendingAttachment {
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self, AttachmentError> {
        let path = path.into();
        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(AttachmentError::NotFound { path });
            }
            Err(source) => return Err(AttachmentError::Read { path, source }),
        };
        if !metadata.is_file() {
            return Err(AttachmentError::NotAFile { path });
        }

        let mime_type = mime_type_for_path(&path).to_string();
        Ok(Self {
            path,
            mime_type,
            size_bytes: metadata.len(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub fn image_ref(&self) -> ImageRef {
        ImageRef {
            file_name: self.file_name(),
            mime_type: self.mime_type.clone(),
            size_bytes: self.size_bytes,
        }
    }

    pub fn encode(&self) -> Result<InlineData, AttachmentError> {
        let bytes = fs::read(&self.path).map_err(|source| AttachmentError::Read {
            path: self.path.clone(),
            source,
        })?;
        Ok(encode_bytes(&bytes, &self.mime_type))
    }
}

/// Holds at most one pending attachment.
#[derive(Debug, Default)]
pub struct AttachmentSlot {
    pending: Option<PendingAttachment>,
}

impl AttachmentSlot {
    /// Stores `attachment`, returning whatever it replaced.
    pub fn attach(&mut self, attachment: PendingAttachment) -> Option<PendingAttachment> {
        self.pending.replace(attachment)
    }

    pub fn detach(&mut self) -> Option<PendingAttachment> {
        self.pending.take()
    }

    pub fn take(&mut self) -> Option<PendingAttachment> {
        self.pending.take()
    }

    pub fn get(&self) -> Option<&PendingAttachment> {
        self.pending.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_none()
    }
}
