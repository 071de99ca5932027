use crate::Result;
use std::path::Path;
use tracing::{debug, info};
use uuid::Uuid;

/// Returns the persisted user identifier, minting and storing a fresh one
/// on first use. The token is opaque; the backend uses it only to scope
/// queries to this client.
pub async fn load_or_create(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();

    match tokio::fs::read_to_string(path).await {
        Ok(contents) => {
            let token = contents.trim();
            if !token.is_empty() {
                debug!("Loaded existing user identity from {}", path.display());
                return Ok(token.to_string());
            }
            // Empty file, fall through and mint a new token
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }

    let token = mint();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, &token).await?;

    info!("Minted new user identity: {}", token);
    Ok(token)
}

fn mint() -> String {
    format!("user_{}", Uuid::new_v4().simple())
}
