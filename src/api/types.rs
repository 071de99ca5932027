use serde::{Deserialize, Serialize};

/// One turn of stored conversation as the backend returns it. Older records
/// carry the photo under `photo_sent`, newer ones under `image_url`; both are
/// kept and the session layer picks whichever is present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub photo_sent: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl HistoryEntry {
    /// The photo attached to this turn, if any.
    pub fn photo(&self) -> Option<&str> {
        self.photo_sent.as_deref().or(self.image_url.as_deref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub user_id: String,
    pub message: String,
    // Backend models this field in camelCase
    #[serde(rename = "imageAnalysis", skip_serializing_if = "Option::is_none")]
    pub image_analysis: Option<ImageAnalysis>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub reply: String,
    #[serde(default)]
    pub photo_url: Option<String>,
}

/// Parsed vision-agent output. Every field is optional; the backend omits
/// whatever its model failed to extract.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageAnalysis {
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub scene: Option<String>,
    #[serde(default)]
    pub safety_score: Option<u32>,
    #[serde(default)]
    pub objects: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisResponse {
    #[serde(default)]
    pub analysis: ImageAnalysis,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default = "default_true")]
    pub is_safe: bool,
    #[serde(default)]
    pub safety_issues: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub user_id: String,
    pub prompt: String,
}

/// A generated-image record. The generation endpoint responds with
/// `imageUrl`, the listing endpoint with `image_url`; the alias accepts both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedImage {
    #[serde(default, alias = "imageUrl")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub keyword: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryItem {
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub objects: Vec<String>,
    #[serde(default)]
    pub mood: Option<String>,
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn history_entry_prefers_photo_sent() {
        let entry: HistoryEntry = serde_json::from_value(json!({
            "role": "assistant",
            "content": "Here you go!",
            "photo_sent": "uploads/a.jpg",
            "image_url": "uploads/b.jpg"
        }))
        .unwrap();

        assert_eq!(entry.photo(), Some("uploads/a.jpg"));
    }

    #[test]
    fn history_entry_falls_back_to_image_url() {
        let entry: HistoryEntry = serde_json::from_value(json!({
            "role": "user",
            "content": "look at this",
            "image_url": "uploads/b.jpg"
        }))
        .unwrap();

        assert_eq!(entry.photo(), Some("uploads/b.jpg"));
    }

    #[test]
    fn chat_request_serializes_analysis_in_camel_case() {
        let request = ChatRequest {
            user_id: "user_1".to_string(),
            message: "hi".to_string(),
            image_analysis: Some(ImageAnalysis {
                comment: Some("Nice shot".to_string()),
                ..Default::default()
            }),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("imageAnalysis").is_some());
        assert!(value.get("image_analysis").is_none());
    }

    #[test]
    fn chat_request_omits_absent_analysis() {
        let request = ChatRequest {
            user_id: "user_1".to_string(),
            message: "hi".to_string(),
            image_analysis: None,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("imageAnalysis").is_none());
    }

    #[test]
    fn generated_image_accepts_camel_case_alias() {
        let from_generation: GeneratedImage = serde_json::from_value(json!({
            "imageUrl": "https://img.test/1.png",
            "caption": "a caption"
        }))
        .unwrap();
        let from_listing: GeneratedImage = serde_json::from_value(json!({
            "image_url": "https://img.test/1.png",
            "prompt": "cosmic"
        }))
        .unwrap();

        assert_eq!(
            from_generation.image_url.as_deref(),
            Some("https://img.test/1.png")
        );
        assert_eq!(
            from_listing.image_url.as_deref(),
            Some("https://img.test/1.png")
        );
    }

    #[test]
    fn analysis_response_defaults_to_safe() {
        let response: AnalysisResponse = serde_json::from_value(json!({
            "analysis": { "mood": "calm", "objects": ["tree"] }
        }))
        .unwrap();

        assert!(response.is_safe);
        assert_eq!(response.analysis.mood.as_deref(), Some("calm"));
        assert_eq!(response.analysis.objects, vec!["tree".to_string()]);
    }

    #[test]
    fn gallery_item_tolerates_sparse_records() {
        let item: GalleryItem = serde_json::from_value(json!({})).unwrap();
        assert!(item.image_url.is_none());
        assert!(item.tags.is_empty());
    }
}
