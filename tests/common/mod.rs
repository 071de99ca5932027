#![allow(dead_code)]

use luna_client::api::HttpClient;
use luna_client::config::BackendConfig;
use luna_client::session::Session;
use wiremock::MockServer;

pub const TEST_USER: &str = "user_test";

/// Backend stand-in for one test.
pub async fn mock_backend() -> MockServer {
    MockServer::start().await
}

pub fn client_for(server: &MockServer) -> HttpClient {
    HttpClient::new(BackendConfig {
        origin: server.uri(),
        timeout_secs: 5,
    })
    .expect("client should build")
}

pub fn session_for(server: &MockServer) -> Session<HttpClient> {
    Session::new(client_for(server), TEST_USER.to_string())
}
