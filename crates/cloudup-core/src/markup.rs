//! Note markup for uploaded assets.

use crate::format::MediaKind;

/// Markup fragment referencing `url`.
///
/// Audio and video become HTML players with a trailing newline; everything
/// else uses the embed syntax, which renders raw files as a plain link.
#[must_use]
pub fn markup(kind: MediaKind, url: &str) -> String {
    match kind {
        MediaKind::Audio => format!("<audio src=\"{url}\" controls></audio>\n"),
        MediaKind::Video => format!("<video src=\"{url}\" controls></video>\n"),
        MediaKind::Image | MediaKind::Raw => format!("![]({url})"),
    }
}

/// Plain local link for a file that was not uploaded.
#[must_use]
pub fn local_link(name: &str) -> String {
    format!("![{name}]({})\n", name.replace(' ', "%20"))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_audio_markup() {
        assert_eq!(
            markup(MediaKind::Audio, "https://x/y.mp3"),
            "<audio src=\"https://x/y.mp3\" controls></audio>\n"
        );
    }

    #[test]
    fn test_video_markup() {
        assert_eq!(
            markup(MediaKind::Video, "https://x/y.mp4"),
            "<video src=\"https://x/y.mp4\" controls></video>\n"
        );
    }

    #[test]
    fn test_image_and_raw_markup() {
        assert_eq!(markup(MediaKind::Image, "https://x/y.png"), "![](https://x/y.png)");
        assert_eq!(markup(MediaKind::Raw, "https://x/y.pdf"), "![](https://x/y.pdf)");
    }

    #[test]
    fn test_local_link() {
        assert_eq!(local_link("cat.png"), "![cat.png](cat.png)\n");
        assert_eq!(local_link("my cat.png"), "![my cat.png](my%20cat.png)\n");
    }
}
