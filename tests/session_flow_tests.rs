//! End-to-end view flows: a real `HttpClient` driven through the session
//! layer against a mocked backend.

use luna_client::session::{Attachment, Speaker, Tab, FALLBACK_REPLY};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

mod common;
use common::{mock_backend, session_for};

#[tokio::test]
async fn sending_a_message_appends_one_user_and_one_luna_turn() {
    let server = mock_backend().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "reply": "hello there",
            "photo_url": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = session_for(&server);
    let sent = session.send_message("hi luna", None).await;

    assert!(sent);
    assert_eq!(session.chat.messages.len(), 2);
    assert_eq!(session.chat.messages[0].speaker, Speaker::User);
    assert_eq!(session.chat.messages[1].speaker, Speaker::Luna);
    assert_eq!(session.chat.messages[1].content, "hello there");
}

#[tokio::test]
async fn attached_image_is_analyzed_and_threaded_into_the_chat_request() {
    let server = mock_backend().await;
    Mock::given(method("POST"))
        .and(path("/api/analyze-image"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "analysis": { "comment": "Nice!", "mood": "happy", "objects": ["dog"] },
            "is_safe": true
        })))
        .expect(1)
        .mount(&server)
        .await;
    // The chat request must carry the analysis the vision call returned
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({
            "imageAnalysis": { "mood": "happy" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "reply": "what a good dog"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = session_for(&server);
    let attachment = Attachment {
        file_name: "dog.jpg".to_string(),
        bytes: vec![0xFF, 0xD8],
    };
    session.send_message("look at him", Some(attachment)).await;

    assert_eq!(session.chat.messages.len(), 2);
    assert_eq!(session.chat.messages[1].content, "what a good dog");

    // Analyze request hit the backend before the chat request
    let requests = server.received_requests().await.unwrap();
    let paths: Vec<_> = requests.iter().map(|r| r.url.path().to_string()).collect();
    assert_eq!(paths, vec!["/api/analyze-image", "/api/chat"]);
}

#[tokio::test]
async fn failed_history_fetch_leaves_the_conversation_empty() {
    let server = mock_backend().await;
    Mock::given(method("GET"))
        .and(path("/api/history/user_test"))
        .respond_with(ResponseTemplate::new(500).set_body_string("db down"))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = session_for(&server);
    session.load_history().await;

    assert!(session.chat.messages.is_empty());
}

#[tokio::test]
async fn chat_failure_degrades_to_the_fallback_apology() {
    let server = mock_backend().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = session_for(&server);
    session.send_message("anyone home?", None).await;

    assert_eq!(session.chat.messages.len(), 2);
    assert_eq!(session.chat.messages[1].content, FALLBACK_REPLY);
    assert!(!session.chat.is_loading);
}

#[tokio::test]
async fn gallery_tab_switch_fetches_once_and_search_fetches_once_more() {
    let server = mock_backend().await;
    // Mount the search-specific mock first so it wins for the second request
    Mock::given(method("GET"))
        .and(path("/api/gallery/user_test"))
        .and(query_param("search", "sunset"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "image_url": "uploads/sunset.jpg", "description": "a sunset", "tags": ["sky"] }
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/gallery/user_test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "image_url": "uploads/a.jpg", "description": "a cat", "tags": ["cat"] },
            { "image_url": "uploads/b.jpg", "description": "a dog", "tags": ["dog"] }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = session_for(&server);

    session.select_tab(Tab::Gallery).await;
    assert_eq!(session.gallery.items.len(), 2);

    session.search_gallery("sunset").await;
    assert_eq!(session.gallery.items.len(), 1);
    assert_eq!(
        session.gallery.items[0].description.as_deref(),
        Some("a sunset")
    );
}

#[tokio::test]
async fn studio_tab_loads_then_generation_prepends() {
    let server = mock_backend().await;
    Mock::given(method("GET"))
        .and(path("/api/generated-images/user_test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "image_url": "https://img.test/old.png", "caption": "old", "prompt": "before" }
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/generate-luna"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "imageUrl": "https://img.test/new.png",
            "caption": "new",
            "status": "success"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = session_for(&server);

    session.select_tab(Tab::Studio).await;
    assert_eq!(session.studio.images.len(), 1);

    session.generate("something new").await.unwrap();
    assert_eq!(session.studio.images.len(), 2);
    assert_eq!(
        session.studio.images[0].image_url.as_deref(),
        Some("https://img.test/new.png")
    );
    assert_eq!(
        session.studio.images[1].caption.as_deref(),
        Some("old")
    );
}
