use std::fmt;

use url::Url;

use crate::ModelError;

const MAX_VIDEO_ID_LEN: usize = 64;

const WATCH_HOSTS: &[&str] = &[
    "youtube.com",
    "www.youtube.com",
    "m.youtube.com",
    "music.youtube.com",
];
const SHORT_HOST: &str = "youtu.be";
const PATH_PREFIXES: &[&str] = &["shorts", "embed", "live", "v"];

/// A validated reference to a YouTube video.
///
/// Keeps the caller-supplied URL untouched next to the extracted video id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoRef {
    url: String,
    video_id: String,
}

impl VideoRef {
    /// Validate `input` and extract its video id.
    ///
    /// Accepted shapes:
    /// - `https://www.youtube.com/watch?v=<id>` (also `m.`, `music.` and bare host)
    /// - `https://youtu.be/<id>`
    /// - `https://www.youtube.com/{shorts,embed,live,v}/<id>`
    ///
    /// A missing scheme is tolerated and treated as `https`.
    pub fn parse(input: &str) -> Result<Self, ModelError> {
        let raw = input.trim();
        if raw.is_empty() {
            return Err(invalid("url is empty"));
        }

        let parsed = if raw.contains("://") {
            Url::parse(raw)
        } else {
            Url::parse(&format!("https://{raw}"))
        }
        .map_err(|e| invalid(format!("'{raw}' is not a url: {e}")))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", parsed.scheme())));
        }
        let host = parsed
            .host_str()
            .map(|h| h.to_ascii_lowercase())
            .ok_or_else(|| invalid("url has no host"))?;

        let id = if host == SHORT_HOST {
            first_segment(&parsed)
        } else if WATCH_HOSTS.contains(&host.as_str()) {
            watch_id(&parsed)
        } else {
            return Err(invalid(format!("'{host}' is not a youtube host")));
        };

        let id = id.ok_or_else(|| invalid("no video id found in url"))?;
        if !is_valid_id(&id) {
            return Err(invalid(format!("malformed video id '{id}'")));
        }

        Ok(Self {
            url: raw.to_string(),
            video_id: id,
        })
    }

    /// URL as supplied by the caller (trimmed).
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn video_id(&self) -> &str {
        &self.video_id
    }
}

impl fmt::Display for VideoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

fn invalid(msg: impl Into<String>) -> ModelError {
    ModelError::InvalidVideoUrl(msg.into())
}

fn first_segment(url: &Url) -> Option<String> {
    url.path_segments()?
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

fn watch_id(url: &Url) -> Option<String> {
    let mut segments = url.path_segments()?.filter(|s| !s.is_empty());
    match segments.next() {
        Some("watch") => url
            .query_pairs()
            .find(|(k, _)| k == "v")
            .map(|(_, v)| v.into_owned()),
        Some(prefix) if PATH_PREFIXES.contains(&prefix) => segments.next().map(str::to_string),
        _ => None,
    }
}

fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_VIDEO_ID_LEN
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id_of(input: &str) -> String {
        VideoRef::parse(input)
            .unwrap_or_else(|e| panic!("{input}: {e}"))
            .video_id()
            .to_string()
    }

    #[test]
    fn accepts_common_url_shapes() {
        assert_eq!(id_of("https://youtube.com/watch?v=abc"), "abc");
        assert_eq!(
            id_of("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s"),
            "dQw4w9WgXcQ"
        );
        assert_eq!(id_of("https://m.youtube.com/watch?feature=share&v=x_Y-z"), "x_Y-z");
        assert_eq!(id_of("https://youtu.be/dQw4w9WgXcQ?si=abc"), "dQw4w9WgXcQ");
        assert_eq!(id_of("https://www.youtube.com/shorts/aBc123"), "aBc123");
        assert_eq!(id_of("https://www.youtube.com/embed/aBc123"), "aBc123");
        assert_eq!(id_of("http://WWW.YOUTUBE.COM/live/aBc123"), "aBc123");
    }

    #[test]
    fn tolerates_missing_scheme_and_whitespace() {
        let v = VideoRef::parse("  youtube.com/watch?v=abc \n").unwrap();
        assert_eq!(v.video_id(), "abc");
        assert_eq!(v.url(), "youtube.com/watch?v=abc");
    }

    #[test]
    fn rejects_empty_and_garbage() {
        for input in ["", "   ", "not a url", "ftp://youtube.com/watch?v=abc"] {
            assert!(
                matches!(VideoRef::parse(input), Err(ModelError::InvalidVideoUrl(_))),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_foreign_hosts() {
        assert!(VideoRef::parse("https://vimeo.com/watch?v=abc").is_err());
        assert!(VideoRef::parse("https://youtube.com.evil.io/watch?v=abc").is_err());
    }

    #[test]
    fn rejects_urls_without_video_id() {
        for input in [
            "https://www.youtube.com/",
            "https://www.youtube.com/watch",
            "https://www.youtube.com/watch?v=",
            "https://www.youtube.com/channel/UC123",
            "https://youtu.be/",
            "https://www.youtube.com/shorts/",
        ] {
            assert!(VideoRef::parse(input).is_err(), "{input:?} should be rejected");
        }
    }

    #[test]
    fn rejects_malformed_ids() {
        assert!(VideoRef::parse("https://youtube.com/watch?v=a%20b").is_err());
        let long = "a".repeat(MAX_VIDEO_ID_LEN + 1);
        assert!(VideoRef::parse(&format!("https://youtu.be/{long}")).is_err());
    }
}
