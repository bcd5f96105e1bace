//! URL helpers for building Ollama endpoints from a configured server URL.

/// Normalize a base URL by removing trailing slashes
///
/// # Examples
///
/// ```
/// use companion::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("http://localhost:11434/"), "http://localhost:11434");
/// assert_eq!(normalize_base_url("http://localhost:11434///"), "http://localhost:11434");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

/// Join a server URL and an endpoint path with exactly one slash between them
///
/// # Examples
///
/// ```
/// use companion::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("http://localhost:11434/", "/api/chat"),
///     "http://localhost:11434/api/chat"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let endpoint = endpoint.trim_start_matches('/');
    format!("{}/{}", normalized_base, endpoint)
}

/// Check that `input` is an absolute http(s) URL and return it normalized.
pub fn parse_base_url(input: &str) -> Result<String, String> {
    let normalized = normalize_base_url(input);
    let url = reqwest::Url::parse(&normalized).map_err(|e| format!("Invalid URL '{input}': {e}"))?;
    match url.scheme() {
        "http" | "https" if url.has_host() => Ok(normalized),
        "http" | "https" => Err(format!("Invalid URL '{input}': missing host")),
        scheme => Err(format!(
            "Invalid URL '{input}': unsupported scheme '{scheme}' (use http or https)"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("http://localhost:11434"),
            "http://localhost:11434"
        );
        assert_eq!(
            normalize_base_url(" http://localhost:11434/ "),
            "http://localhost:11434"
        );
        assert_eq!(
            normalize_base_url("http://gpu-box:11434/ollama///"),
            "http://gpu-box:11434/ollama"
        );
        assert_eq!(normalize_base_url(""), "");
        assert_eq!(normalize_base_url("///"), "");
    }

    #[test]
    fn test_construct_api_url() {
        assert_eq!(
            construct_api_url("http://localhost:11434", "api/chat"),
            "http://localhost:11434/api/chat"
        );
        assert_eq!(
            construct_api_url("http://localhost:11434/", "/api/tags"),
            "http://localhost:11434/api/tags"
        );
        // Reverse proxies often mount Ollama under a path prefix.
        assert_eq!(
            construct_api_url("https://example.com/ollama/", "///api/generate"),
            "https://example.com/ollama/api/generate"
        );
    }

    #[test]
    fn test_parse_base_url() {
        assert_eq!(
            parse_base_url("http://localhost:11434/").as_deref(),
            Ok("http://localhost:11434")
        );
        assert!(parse_base_url("localhost:11434").is_err());
        assert!(parse_base_url("ftp://example.com")
            .unwrap_err()
            .contains("unsupported scheme 'ftp'"));
        assert!(parse_base_url("not a url").is_err());
    }
}
