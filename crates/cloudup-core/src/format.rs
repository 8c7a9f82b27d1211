//! Media kind classification.
//!
//! A file is classified either from its MIME type (native file handles) or,
//! when only a path or URL is known, from its extension. Extension matching
//! is case-insensitive.

use cloudup_cloudinary::ResourceType;

const AUDIO_EXTENSIONS: &[&str] = &[
    "mp3", "wav", "ogg", "oga", "opus", "flac", "aac", "m4a", "wma", "aiff", "aif", "amr",
];
const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "webm", "mov", "mkv", "avi", "m4v", "ogv", "flv", "wmv", "3gp", "mpeg", "mpg",
];
const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "webp", "svg", "bmp", "tif", "tiff", "ico", "avif", "heic",
    "heif",
];

/// Media category of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Image,
    Video,
    Audio,
    Raw,
}

impl MediaKind {
    /// Lowercase name, as used in config keys.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Raw => "raw",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What is known about a file at classification time.
#[derive(Debug, Clone, Copy)]
pub enum MediaSource<'a> {
    /// A native file handle with a MIME type.
    Local { mime: &'a str },
    /// Only a path or URL is known.
    Remote(&'a str),
}

/// Classify a file by MIME type or extension.
#[must_use]
pub fn classify(source: MediaSource<'_>) -> MediaKind {
    match source {
        MediaSource::Local { mime } => classify_mime(mime),
        MediaSource::Remote(url) => classify_extension(url).unwrap_or(MediaKind::Raw),
    }
}

/// Classify by the top-level type of a MIME string.
#[must_use]
pub fn classify_mime(mime: &str) -> MediaKind {
    let top = mime.split('/').next().unwrap_or_default().trim();
    if top.eq_ignore_ascii_case("image") {
        MediaKind::Image
    } else if top.eq_ignore_ascii_case("video") {
        MediaKind::Video
    } else if top.eq_ignore_ascii_case("audio") {
        MediaKind::Audio
    } else {
        MediaKind::Raw
    }
}

/// Classify by the extension of a path or URL. `None` if the extension is unknown.
///
/// Query strings and fragments are ignored.
#[must_use]
pub fn classify_extension(url: &str) -> Option<MediaKind> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let file_name = path.rsplit('/').next().unwrap_or(path);
    let (_, ext) = file_name.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();

    if AUDIO_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaKind::Audio)
    } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaKind::Video)
    } else if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaKind::Image)
    } else {
        None
    }
}

/// Kind of an uploaded asset from the reported resource type and its URL.
///
/// The endpoint reports audio as `video`, so an audio extension wins.
#[must_use]
pub fn classify_uploaded(resource_type: ResourceType, secure_url: &str) -> MediaKind {
    let by_extension = classify_extension(secure_url);
    if by_extension == Some(MediaKind::Audio) {
        return MediaKind::Audio;
    }
    match resource_type {
        ResourceType::Video => MediaKind::Video,
        ResourceType::Image => MediaKind::Image,
        ResourceType::Raw => MediaKind::Raw,
        ResourceType::Unknown => by_extension.unwrap_or(MediaKind::Raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_mime_prefixes() {
        assert_eq!(classify_mime("image/png"), MediaKind::Image);
        assert_eq!(classify_mime("video/mp4"), MediaKind::Video);
        assert_eq!(classify_mime("audio/mpeg"), MediaKind::Audio);
        assert_eq!(classify_mime("application/pdf"), MediaKind::Raw);
        assert_eq!(classify_mime("text/plain"), MediaKind::Raw);
        assert_eq!(classify_mime(""), MediaKind::Raw);
        assert_eq!(classify_mime("IMAGE/JPEG"), MediaKind::Image);
    }

    #[test]
    fn test_classify_extension_lists() {
        assert_eq!(classify_extension("https://x/y.mp3"), Some(MediaKind::Audio));
        assert_eq!(classify_extension("clips/y.webm"), Some(MediaKind::Video));
        assert_eq!(classify_extension("y.jpeg"), Some(MediaKind::Image));
        assert_eq!(classify_extension("y.pdf"), None);
        assert_eq!(classify_extension("no-extension"), None);
    }

    #[test]
    fn test_classify_extension_mixed_case() {
        assert_eq!(classify_extension("Photo.PNG"), Some(MediaKind::Image));
        assert_eq!(classify_extension("Song.Mp3"), Some(MediaKind::Audio));
        assert_eq!(classify_extension("Clip.MoV"), Some(MediaKind::Video));
    }

    #[test]
    fn test_classify_extension_ignores_query_and_dirs() {
        assert_eq!(
            classify_extension("https://x/a.b/file.png?v=1#top"),
            Some(MediaKind::Image)
        );
        assert_eq!(classify_extension("https://x/dir.mp3/file"), None);
    }

    #[test]
    fn test_extension_agrees_with_mime() {
        let cases = [
            ("a.png", "image/png"),
            ("a.gif", "image/gif"),
            ("a.mp4", "video/mp4"),
            ("a.webm", "video/webm"),
            ("a.mp3", "audio/mpeg"),
            ("a.wav", "audio/wav"),
            ("a.flac", "audio/flac"),
        ];
        for (name, mime) in cases {
            assert_eq!(
                classify(MediaSource::Remote(name)),
                classify(MediaSource::Local { mime }),
                "{name} vs {mime}"
            );
        }
    }

    #[test]
    fn test_classify_remote_unknown_is_raw() {
        assert_eq!(classify(MediaSource::Remote("notes.zip")), MediaKind::Raw);
    }

    #[test]
    fn test_classify_uploaded() {
        assert_eq!(
            classify_uploaded(ResourceType::Video, "https://x/upload/song.mp3"),
            MediaKind::Audio
        );
        assert_eq!(
            classify_uploaded(ResourceType::Video, "https://x/upload/clip.mp4"),
            MediaKind::Video
        );
        assert_eq!(
            classify_uploaded(ResourceType::Image, "https://x/upload/cat.png"),
            MediaKind::Image
        );
        assert_eq!(
            classify_uploaded(ResourceType::Raw, "https://x/upload/doc.pdf"),
            MediaKind::Raw
        );
        assert_eq!(
            classify_uploaded(ResourceType::Unknown, "https://x/upload/cat.png"),
            MediaKind::Image
        );
    }
}
