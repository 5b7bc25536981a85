//! Endpoint helpers for the generative language service.

/// Normalize a base URL by removing trailing slashes
///
/// # Examples
///
/// ```
/// use matetutor::utils::url::normalize_base_url;
///
/// assert_eq!(
///     normalize_base_url("https://generativelanguage.googleapis.com/v1beta/"),
///     "https://generativelanguage.googleapis.com/v1beta"
/// );
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

/// Join a base URL and an endpoint path without doubling slashes.
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let endpoint = endpoint.trim_start_matches('/');
    format!("{}/{}", normalized_base, endpoint)
}

/// Streaming endpoint for `model`, asking for server-sent events.
///
/// Accepts both bare ids (`gemini-2.5-flash`) and resource names
/// (`models/gemini-2.5-flash`).
pub fn stream_generate_url(base_url: &str, model: &str) -> String {
    let model = model.trim().trim_start_matches("models/");
    construct_api_url(
        base_url,
        &format!("models/{model}:streamGenerateContent?alt=sse"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("https://api.example.com/v1beta"),
            "https://api.example.com/v1beta"
        );
        assert_eq!(
            normalize_base_url("https://api.example.com/v1beta///"),
            "https://api.example.com/v1beta"
        );
        assert_eq!(normalize_base_url("https://api.example.com/"), "https://api.example.com");
    }

    #[test]
    fn test_construct_api_url() {
        assert_eq!(
            construct_api_url("https://api.example.com/v1beta/", "/models"),
            "https://api.example.com/v1beta/models"
        );
    }

    #[test]
    fn stream_url_targets_sse_endpoint() {
        let expected = "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:streamGenerateContent?alt=sse";
        assert_eq!(
            stream_generate_url(
                "https://generativelanguage.googleapis.com/v1beta",
                "gemini-2.5-flash"
            ),
            expected
        );
        assert_eq!(
            stream_generate_url(
                "https://generativelanguage.googleapis.com/v1beta/",
                "models/gemini-2.5-flash"
            ),
            expected
        );
    }
}
