/// Resolves an image reference returned by the backend into something a
/// renderer can fetch. Absolute URLs and data URIs pass through unchanged;
/// everything else is a backend-relative path (`uploads/...`) and gets the
/// configured origin prepended.
pub fn resolve_image_url(origin: &str, url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") || url.starts_with("data:") {
        return url.to_string();
    }

    format!(
        "{}/{}",
        origin.trim_end_matches('/'),
        url.trim_start_matches('/')
    )
}
