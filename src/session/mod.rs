mod types;

pub use types::*;

use crate::api::{ChatRequest, GenerateRequest, ImageAnalysis, LunaApi};
use crate::Result;
use tracing::{debug, warn};

/// Shown in place of a reply when the chat request fails.
pub const FALLBACK_REPLY: &str = "I'm having trouble connecting right now. Please try again.";

/// Transient view state for one client run: the tab selector plus the four
/// views, each refreshed by at most one or two backend calls per user action.
/// Nothing here survives the process; the only durable state is the user id.
pub struct Session<A: LunaApi> {
    api: A,
    user_id: String,
    active_tab: Tab,
    pub chat: ChatView,
    pub vision: VisionView,
    pub gallery: GalleryView,
    pub studio: StudioView,
}

impl<A: LunaApi> Session<A> {
    pub fn new(api: A, user_id: String) -> Self {
        Self {
            api,
            user_id,
            active_tab: Tab::Chat,
            chat: ChatView::default(),
            vision: VisionView::default(),
            gallery: GalleryView::default(),
            studio: StudioView::default(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    /// Switches views. Entering the gallery or studio refreshes that view
    /// with exactly one fetch; re-selecting the current tab does nothing.
    pub async fn select_tab(&mut self, tab: Tab) {
        if tab == self.active_tab {
            return;
        }
        self.active_tab = tab;

        match tab {
            Tab::Gallery => self.load_gallery().await,
            Tab::Studio => self.load_generated().await,
            Tab::Chat | Tab::Vision => {}
        }
    }

    /// Replaces the conversation with the stored history. A failed fetch
    /// keeps whatever was already displayed.
    pub async fn load_history(&mut self) {
        match self.api.history(&self.user_id).await {
            Ok(entries) => {
                debug!("Loaded {} history entries", entries.len());
                self.chat.messages = entries.into_iter().map(ChatMessage::from).collect();
            }
            Err(e) => {
                warn!("Error loading history: {}", e);
            }
        }
    }

    /// Sends one chat message, appending exactly one user turn and one Luna
    /// turn. An attached image is analyzed first and the analysis threaded
    /// into the chat request. Any failure along the way degrades to the
    /// fallback apology; this never errors.
    ///
    /// Returns false when there is nothing to send.
    pub async fn send_message(&mut self, text: &str, attachment: Option<Attachment>) -> bool {
        if text.trim().is_empty() && attachment.is_none() {
            return false;
        }

        self.chat.messages.push(ChatMessage::user(text));
        self.chat.is_loading = true;

        let reply = self.exchange(text, attachment).await;
        match reply {
            Ok(reply) => {
                self.chat
                    .messages
                    .push(ChatMessage::luna(reply.reply, reply.photo_url));
            }
            Err(e) => {
                warn!("Chat error: {}", e);
                self.chat.messages.push(ChatMessage::luna(FALLBACK_REPLY, None));
            }
        }

        self.chat.is_loading = false;
        true
    }

    async fn exchange(
        &mut self,
        text: &str,
        attachment: Option<Attachment>,
    ) -> Result<crate::api::ChatReply> {
        let mut analysis: Option<ImageAnalysis> = None;
        if let Some(attachment) = attachment {
            let response = self
                .api
                .analyze_image(&self.user_id, &attachment.file_name, attachment.bytes)
                .await?;
            analysis = Some(response.analysis);
        }

        self.api
            .chat(ChatRequest {
                user_id: self.user_id.clone(),
                message: text.to_string(),
                image_analysis: analysis,
            })
            .await
    }

    /// Standalone vision-tab analysis. Stores the result on success and
    /// propagates the error otherwise so the front end can surface it.
    pub async fn analyze(&mut self, file_name: &str, bytes: Vec<u8>) -> Result<()> {
        self.vision.is_analyzing = true;

        let result = self.api.analyze_image(&self.user_id, file_name, bytes).await;
        self.vision.is_analyzing = false;

        let response = result?;
        self.vision.analysis = Some(response.analysis);
        Ok(())
    }

    pub fn clear_analysis(&mut self) {
        self.vision.analysis = None;
    }

    /// Stores a search term and issues one gallery fetch carrying it.
    /// A blank term clears the filter.
    pub async fn search_gallery(&mut self, query: &str) {
        self.gallery.search_query = query.trim().to_string();
        self.load_gallery().await;
    }

    async fn load_gallery(&mut self) {
        self.gallery.is_loading = true;

        let query = self.gallery.search_query.clone();
        let search = if query.is_empty() {
            None
        } else {
            Some(query.as_str())
        };
        match self.api.gallery(&self.user_id, search).await {
            Ok(items) => {
                debug!("Loaded {} gallery items", items.len());
                self.gallery.items = items;
            }
            Err(e) => {
                warn!("Error loading gallery: {}", e);
            }
        }

        self.gallery.is_loading = false;
    }

    /// Requests one generated image and prepends it to the studio list,
    /// newest first. Blank prompts are ignored; failures propagate and
    /// leave the list untouched.
    pub async fn generate(&mut self, prompt: &str) -> Result<bool> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Ok(false);
        }

        self.studio.is_generating = true;
        let result = self
            .api
            .generate(GenerateRequest {
                user_id: self.user_id.clone(),
                prompt: prompt.to_string(),
            })
            .await;
        self.studio.is_generating = false;

        let image = result?;
        self.studio.images.insert(0, image);
        Ok(true)
    }

    async fn load_generated(&mut self) {
        match self.api.generated_images(&self.user_id).await {
            Ok(images) => {
                debug!("Loaded {} generated images", images.len());
                self.studio.images = images;
            }
            Err(e) => {
                warn!("Error loading generated images: {}", e);
            }
        }
    }
}
