//! URL helpers for the backend address and audio files.

use reqwest::Url;

/// Port the object store serves audio from when the backend is reached
/// directly.
const OBJECT_STORE_PORT: u16 = 9000;

/// Clean up a user-entered backend address.
///
/// Trims whitespace, assumes `http://` when no scheme is given and drops a
/// single trailing slash.
///
/// ```
/// use vtg_editor::task::normalize_base_url;
///
/// assert_eq!(normalize_base_url(" 10.0.0.5:8000/ "), "http://10.0.0.5:8000");
/// assert_eq!(normalize_base_url("https://api.example.org"), "https://api.example.org");
/// ```
pub fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim();
    let mut url = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    };
    if url.ends_with('/') {
        url.pop();
    }
    url
}

/// Resolve a task's `voice_name` into something playable.
///
/// * absolute `http(s)` names are returned unchanged;
/// * behind an ngrok tunnel only the API host is reachable, so the path is
///   appended to the base URL;
/// * otherwise the file is fetched from the object store on the API host.
pub fn format_voice_url(base_url: &str, path: &str) -> String {
    if path.is_empty() {
        return String::new();
    }
    if path.starts_with("http") {
        return path.to_string();
    }

    let clean = path.trim_start_matches('/');

    if base_url.contains("ngrok") {
        return format!("{}/{}", base_url.trim_end_matches('/'), clean);
    }

    match Url::parse(base_url) {
        Ok(url) => {
            let host = url.host_str().unwrap_or("localhost");
            format!("{}://{}:{}/{}", url.scheme(), host, OBJECT_STORE_PORT, clean)
        }
        Err(e) => {
            log::warn!("cannot parse base url {base_url:?} ({e}); using path as-is");
            clean.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_adds_scheme_and_strips_slash() {
        assert_eq!(normalize_base_url("localhost:8000/"), "http://localhost:8000");
    }

    #[test]
    fn normalize_keeps_https() {
        assert_eq!(
            normalize_base_url("  https://x.ngrok-free.dev  "),
            "https://x.ngrok-free.dev"
        );
    }

    #[test]
    fn voice_url_empty_path() {
        assert_eq!(format_voice_url("http://localhost:8000", ""), "");
    }

    #[test]
    fn voice_url_absolute_passthrough() {
        let url = "https://cdn.example.org/a.wav";
        assert_eq!(format_voice_url("http://localhost:8000", url), url);
    }

    #[test]
    fn voice_url_through_ngrok() {
        assert_eq!(
            format_voice_url("https://abc.ngrok-free.dev", "/voices/1.wav"),
            "https://abc.ngrok-free.dev/voices/1.wav"
        );
    }

    #[test]
    fn voice_url_object_store_port() {
        assert_eq!(
            format_voice_url("http://192.168.1.4:8000", "voices/1.wav"),
            "http://192.168.1.4:9000/voices/1.wav"
        );
    }

    #[test]
    fn voice_url_unparseable_base() {
        assert_eq!(format_voice_url("not a url", "/a.wav"), "a.wav");
    }
}
