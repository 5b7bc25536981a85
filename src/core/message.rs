#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TranscriptRole {
    User,
    Assistant,
    /// App-authored notes rendered in the transcript but never sent to the model.
    AppInfo,
}

impl TranscriptRole {
    pub fn as_str(self) -> &'static str {
        match self {
            TranscriptRole::User => "user",
            TranscriptRole::Assistant => "assistant",
            TranscriptRole::AppInfo => "app/info",
        }
    }

    pub fn is_user(self) -> bool {
        self == TranscriptRole::User
    }

    pub fn is_assistant(self) -> bool {
        self == TranscriptRole::Assistant
    }

    pub fn is_app(self) -> bool {
        self == TranscriptRole::AppInfo
    }
}

impl AsRef<str> for TranscriptRole {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Display metadata for an image that travelled with a user turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: u64,
}

impl ImageRef {
    pub fn label(&self) -> String {
        format!(
            "{} · {} · {}",
            self.file_name,
            self.mime_type,
            format_size(self.size_bytes)
        )
    }
}

fn format_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * 1024;
    if bytes >= MIB {
        format!("{:.1} MB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{} KB", bytes.div_ceil(KIB))
    } else {
        format!("{bytes} B")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: TranscriptRole,
    pub text: Option<String>,
    pub image: Option<ImageRef>,
}

impl Turn {
    /// Builds a user turn, or `None` when there is neither text nor an image.
    pub fn user(text: Option<String>, image: Option<ImageRef>) -> Option<Self> {
        let text = text.filter(|t| !t.is_empty());
        if text.is_none() && image.is_none() {
            return None;
        }
        Some(Self {
            role: TranscriptRole::User,
            text,
            image,
        })
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: TranscriptRole::Assistant,
            text: Some(text.into()),
            image: None,
        }
    }

    pub fn app_info(text: impl Into<String>) -> Self {
        Self {
            role: TranscriptRole::AppInfo,
            text: Some(text.into()),
            image: None,
        }
    }

    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    pub fn is_user(&self) -> bool {
        self.role.is_user()
    }

    pub fn is_assistant(&self) -> bool {
        self.role.is_assistant()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_image() -> ImageRef {
        ImageRef {
            file_name: "pregunta.png".into(),
            mime_type: "image/png".into(),
            size_bytes: 2048,
        }
    }

    #[test]
    fn user_turn_requires_text_or_image() {
        assert!(Turn::user(None, None).is_none());
        assert!(Turn::user(Some(String::new()), None).is_none());

        let text_only = Turn::user(Some("2+2=?".into()), None).expect("text turn");
        assert_eq!(text_only.text(), "2+2=?");
        assert!(text_only.image.is_none());

        let image_only = Turn::user(Some(String::new()), Some(sample_image())).expect("image");
        assert!(image_only.text.is_none());
        assert_eq!(image_only.image, Some(sample_image()));
    }

    #[test]
    fn image_label_includes_name_type_and_size() {
        assert_eq!(sample_image().label(), "pregunta.png · image/png · 2 KB");

        let tiny = ImageRef {
            size_bytes: 512,
            ..sample_image()
        };
        assert_eq!(tiny.label(), "pregunta.png · image/png · 512 B");

        let large = ImageRef {
            size_bytes: 3 * 1024 * 1024 + 512 * 1024,
            ..sample_image()
        };
        assert_eq!(large.label(), "pregunta.png · image/png · 3.5 MB");
    }

    #[test]
    fn app_roles_are_not_conversation_roles() {
        assert!(TranscriptRole::AppInfo.is_app());
        assert!(!TranscriptRole::User.is_app());
        assert_eq!(TranscriptRole::Assistant.as_str(), "assistant");
    }
}
