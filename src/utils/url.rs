//! URL helpers for backend endpoints and artifact references
//!
//! The backend returns artifact locations as server-relative paths
//! (`/api/images/results/sr_x.png`). These helpers join such paths onto the
//! configured base URL without doubling or dropping slashes.

/// Normalize a base URL by removing trailing slashes
///
/// # Examples
///
/// ```
/// use medai_vision::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("http://localhost:5000"), "http://localhost:5000");
/// assert_eq!(normalize_base_url("http://localhost:5000/"), "http://localhost:5000");
/// assert_eq!(normalize_base_url("http://localhost:5000///"), "http://localhost:5000");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

/// Construct a complete endpoint URL from a base URL and an endpoint path
///
/// # Examples
///
/// ```
/// use medai_vision::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("http://localhost:5000", "api/upload"),
///     "http://localhost:5000/api/upload"
/// );
/// assert_eq!(
///     construct_api_url("http://localhost:5000/", "/api/chat"),
///     "http://localhost:5000/api/chat"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let endpoint = endpoint.trim_start_matches('/');
    format!("{}/{}", normalized_base, endpoint)
}

/// Resolve an artifact reference returned by the backend.
///
/// Absolute `http(s)` URLs are returned unchanged; anything else is treated
/// as a path on the backend.
pub fn resolve_artifact_url(base_url: &str, reference: &str) -> String {
    let reference = reference.trim();
    if is_absolute_http_url(reference) {
        return reference.to_string();
    }
    construct_api_url(base_url, reference)
}

fn is_absolute_http_url(value: &str) -> bool {
    let lower = value.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("http://localhost:5000"),
            "http://localhost:5000"
        );
        assert_eq!(
            normalize_base_url(" http://scanner.local:8080/ "),
            "http://scanner.local:8080"
        );
        assert_eq!(normalize_base_url(""), "");
        assert_eq!(normalize_base_url("///"), "");
    }

    #[test]
    fn test_construct_api_url() {
        assert_eq!(
            construct_api_url("http://localhost:5000", "api/upload"),
            "http://localhost:5000/api/upload"
        );
        assert_eq!(
            construct_api_url("http://localhost:5000///", "///api/chat"),
            "http://localhost:5000/api/chat"
        );
        // Backends mounted below a path prefix keep the prefix
        assert_eq!(
            construct_api_url("https://example.org/medai/", "api/upload"),
            "https://example.org/medai/api/upload"
        );
    }

    #[test]
    fn artifact_paths_resolve_against_backend() {
        assert_eq!(
            resolve_artifact_url(
                "http://localhost:5000/",
                "/api/images/results/sr_1234.png"
            ),
            "http://localhost:5000/api/images/results/sr_1234.png"
        );
        assert_eq!(
            resolve_artifact_url("http://localhost:5000", "b.png"),
            "http://localhost:5000/b.png"
        );
    }

    #[test]
    fn absolute_artifact_urls_are_kept() {
        assert_eq!(
            resolve_artifact_url("http://localhost:5000", "HTTPS://cdn.example.org/a.png"),
            "HTTPS://cdn.example.org/a.png"
        );
    }
}
