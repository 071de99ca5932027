use crate::api::{GalleryItem, GeneratedImage, HistoryEntry, ImageAnalysis};

/// The four views of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Chat,
    Vision,
    Gallery,
    Studio,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Luna,
}

/// A rendered conversation turn.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub speaker: Speaker,
    pub content: String,
    pub photo: Option<String>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            content: content.into(),
            photo: None,
        }
    }

    pub fn luna(content: impl Into<String>, photo: Option<String>) -> Self {
        Self {
            speaker: Speaker::Luna,
            content: content.into(),
            photo,
        }
    }
}

impl From<HistoryEntry> for ChatMessage {
    fn from(entry: HistoryEntry) -> Self {
        let speaker = if entry.role == "assistant" {
            Speaker::Luna
        } else {
            Speaker::User
        };
        let photo = entry.photo().map(str::to_string);

        Self {
            speaker,
            content: entry.content,
            photo,
        }
    }
}

/// An image staged for upload.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Default)]
pub struct ChatView {
    pub messages: Vec<ChatMessage>,
    pub is_loading: bool,
}

#[derive(Debug, Default)]
pub struct VisionView {
    pub analysis: Option<ImageAnalysis>,
    pub is_analyzing: bool,
}

#[derive(Debug, Default)]
pub struct GalleryView {
    pub items: Vec<GalleryItem>,
    pub search_query: String,
    pub is_loading: bool,
}

#[derive(Debug, Default)]
pub struct StudioView {
    pub images: Vec<GeneratedImage>,
    pub is_generating: bool,
}
