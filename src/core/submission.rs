use crate::api::{Content, Part};
use crate::core::attachment::{AttachmentError, PendingAttachment};
use crate::core::message::Turn;

/// What the input form hands over when the user submits a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    text: Option<String>,
    attachment: Option<PendingAttachment>,
}

impl Submission {
    /// Trims `text` and returns `None` when nothing would be sent.
    pub fn new(text: &str, attachment: Option<PendingAttachment>) -> Option<Self> {
        let trimmed = text.trim();
        let text = (!trimmed.is_empty()).then(|| trimmed.to_string());
        if text.is_none() && attachment.is_none() {
            return None;
        }
        Some(Self { text, attachment })
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn attachment(&self) -> Option<&PendingAttachment> {
        self.attachment.as_ref()
    }

    /// The transcript turn for this submission. Always present, since a
    /// submission never lacks both text and an image.
    pub fn user_turn(&self) -> Option<Turn> {
        Turn::user(
            self.text.clone(),
            self.attachment.as_ref().map(PendingAttachment::image_ref),
        )
    }

    /// Encodes the submission as a user content: text part first, then the image.
    pub fn to_content(&self) -> Result<Content, AttachmentError> {
        let mut parts = Vec::with_capacity(2);
        if let Some(text) = &self.text {
            parts.push(Part::text(text.clone()));
        }
        if let Some(attachment) = &self.attachment {
            parts.push(Part::inline_data(attachment.encode()?));
        }
        Ok(Content::user(parts))
    }
}
