use crate::api::{resolve_image_url, ImageAnalysis, LunaApi};
use crate::session::{Attachment, ChatMessage, Session, Speaker, Tab};
use crate::Result;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::debug;

const HELP: &str = "\
Commands:
  /chat /vision /gallery /studio   switch view
  /history                         re-render the conversation
  /attach <path>                   stage an image for the next message
  /analyze <path>                  analyze an image (vision view)
  /search <term>                   search the gallery
  /generate <prompt>               create a new image (studio view)
  /help                            show this help
  /quit                            exit
Anything else is sent to Luna as a chat message.";

/// Line-oriented front end over the four views. One command or message per
/// line; at most one backend call in flight at a time.
pub struct Repl<A: LunaApi> {
    session: Session<A>,
    origin: String,
    pending_attachment: Option<Attachment>,
}

impl<A: LunaApi> Repl<A> {
    pub fn new(session: Session<A>, origin: String) -> Self {
        Self {
            session,
            origin,
            pending_attachment: None,
        }
    }

    pub async fn run(mut self) -> Result<()> {
        let mut stdout = tokio::io::stdout();
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        self.session.load_history().await;
        let mut screen = self.render_chat();
        screen.push_str("\n> ");
        stdout.write_all(screen.as_bytes()).await?;
        stdout.flush().await?;

        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line == "/quit" || line == "/exit" {
                break;
            }

            let output = self.dispatch(line).await;
            let mut screen = output;
            screen.push_str("\n> ");
            stdout.write_all(screen.as_bytes()).await?;
            stdout.flush().await?;
        }

        Ok(())
    }

    async fn dispatch(&mut self, line: &str) -> String {
        let (command, rest) = match line.split_once(' ') {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        match command {
            "" => String::new(),
            "/help" => HELP.to_string(),
            "/chat" => {
                self.session.select_tab(Tab::Chat).await;
                self.render_chat()
            }
            "/vision" => {
                self.session.select_tab(Tab::Vision).await;
                self.render_vision()
            }
            "/gallery" => {
                self.session.select_tab(Tab::Gallery).await;
                self.render_gallery()
            }
            "/studio" => {
                self.session.select_tab(Tab::Studio).await;
                self.render_studio()
            }
            "/history" => {
                self.session.load_history().await;
                self.render_chat()
            }
            "/attach" => self.stage_attachment(rest).await,
            "/analyze" => self.analyze(rest).await,
            "/search" => {
                self.session.search_gallery(rest).await;
                self.render_gallery()
            }
            "/generate" => match self.session.generate(rest).await {
                Ok(true) => self.render_studio(),
                Ok(false) => "Nothing to generate; give me a prompt.".to_string(),
                Err(e) => {
                    debug!("Generation error: {}", e);
                    "Failed to generate image".to_string()
                }
            },
            _ if command.starts_with('/') => {
                format!("Unknown command: {} (try /help)", command)
            }
            _ => self.send(line).await,
        }
    }

    async fn send(&mut self, text: &str) -> String {
        let attachment = self.pending_attachment.take();
        if !self.session.send_message(text, attachment).await {
            return "Nothing to send.".to_string();
        }

        // Show the tail of the conversation: the turn just sent and the reply
        let mut out = String::new();
        let messages = &self.session.chat.messages;
        for msg in messages.iter().skip(messages.len().saturating_sub(2)) {
            out.push_str(&self.format_message(msg));
        }
        out
    }

    async fn stage_attachment(&mut self, path: &str) -> String {
        if path.is_empty() {
            return "Usage: /attach <path>".to_string();
        }

        match read_attachment(path).await {
            Ok(attachment) => {
                let line = format!(
                    "Attached {} ({} bytes); it will ride along on your next message.",
                    attachment.file_name,
                    attachment.bytes.len()
                );
                self.pending_attachment = Some(attachment);
                line
            }
            Err(e) => format!("Could not read {}: {}", path, e),
        }
    }

    async fn analyze(&mut self, path: &str) -> String {
        if path.is_empty() {
            return "Usage: /analyze <path>".to_string();
        }

        let attachment = match read_attachment(path).await {
            Ok(attachment) => attachment,
            Err(e) => return format!("Could not read {}: {}", path, e),
        };

        match self
            .session
            .analyze(&attachment.file_name, attachment.bytes)
            .await
        {
            Ok(()) => self.render_vision(),
            Err(e) => {
                debug!("Analysis error: {}", e);
                "Failed to analyze image".to_string()
            }
        }
    }

    fn render_chat(&self) -> String {
        let messages = &self.session.chat.messages;
        if messages.is_empty() {
            return "Say hello to Luna! (/help for commands)".to_string();
        }

        let mut out = String::new();
        for msg in messages {
            out.push_str(&self.format_message(msg));
        }
        out
    }

    fn format_message(&self, msg: &ChatMessage) -> String {
        let speaker = match msg.speaker {
            Speaker::User => "you",
            Speaker::Luna => "luna",
        };

        let mut out = format!("[{}] {}\n", speaker, msg.content);
        if let Some(photo) = &msg.photo {
            out.push_str(&format!("      📷 {}\n", resolve_image_url(&self.origin, photo)));
        }
        out
    }

    fn render_vision(&self) -> String {
        match &self.session.vision.analysis {
            Some(analysis) => format_analysis(analysis),
            None => "No analysis yet. /analyze <path> to ask Luna about an image.".to_string(),
        }
    }

    fn render_gallery(&self) -> String {
        let gallery = &self.session.gallery;
        if gallery.items.is_empty() {
            return "No images found.".to_string();
        }

        let mut out = String::new();
        if !gallery.search_query.is_empty() {
            out.push_str(&format!("Search: {}\n", gallery.search_query));
        }
        for (i, item) in gallery.items.iter().enumerate() {
            out.push_str(&format!(
                "{:>3}. {}\n",
                i + 1,
                item.description.as_deref().unwrap_or("(no description)")
            ));
            if let Some(url) = &item.image_url {
                out.push_str(&format!("     {}\n", resolve_image_url(&self.origin, url)));
            }
            if !item.tags.is_empty() {
                out.push_str(&format!("     tags: {}\n", item.tags.join(", ")));
            }
        }
        out
    }

    fn render_studio(&self) -> String {
        let images = &self.session.studio.images;
        if images.is_empty() {
            return "Nothing created yet. /generate <prompt> to dream something up.".to_string();
        }

        let mut out = String::new();
        for (i, img) in images.iter().enumerate() {
            out.push_str(&format!(
                "{:>3}. {}\n",
                i + 1,
                img.caption.as_deref().unwrap_or("(no caption)")
            ));
            if let Some(url) = &img.image_url {
                out.push_str(&format!("     {}\n", resolve_image_url(&self.origin, url)));
            }
            if let Some(prompt) = &img.prompt {
                out.push_str(&format!("     \"{}\"\n", prompt));
            }
        }
        out
    }
}

fn format_analysis(analysis: &ImageAnalysis) -> String {
    let mut out = format!(
        "\"{}\"\n  - Luna's Reaction\n",
        analysis.comment.as_deref().unwrap_or("Wow, interesting shot!")
    );
    if let Some(mood) = &analysis.mood {
        out.push_str(&format!("mood:   {}\n", mood));
    }
    if let Some(score) = analysis.safety_score {
        out.push_str(&format!("score:  {}% safe\n", score));
    }
    if !analysis.objects.is_empty() {
        out.push_str(&format!("objects: {}\n", analysis.objects.join(", ")));
    }
    out
}

async fn read_attachment(path: &str) -> Result<Attachment> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "image".to_string());

    Ok(Attachment { file_name, bytes })
}
