mod client;
mod types;
mod urls;

pub use client::{HttpClient, LunaApi};
pub use types::*;
pub use urls::resolve_image_url;
