//! Delivery URL transformation.
//!
//! Transformations are injected right after the first `/upload/` delimiter
//! of the canonical secure URL. The transformation string goes in first and
//! `f_auto` second, each splitting the URL produced by the previous step, so
//! `f_auto` ends up in front: `.../upload/f_auto/w_100/abc.png`.
//!
//! Applying the transformer to its own output injects the segments again.

use cloudup_config::Config;

use crate::format::MediaKind;

const DELIMITER: &str = "/upload/";
const AUTO_FORMAT: &str = "f_auto";

/// Transformation string for `kind`: the per-kind setting if non-empty,
/// otherwise the global one. Raw files only use the global setting.
#[must_use]
pub fn params_for(config: &Config, kind: MediaKind) -> &str {
    let transform = &config.transform;
    let specific = match kind {
        MediaKind::Image => transform.image.as_str(),
        MediaKind::Video => transform.video.as_str(),
        MediaKind::Audio => transform.audio.as_str(),
        MediaKind::Raw => "",
    };
    if specific.trim().is_empty() {
        &transform.params
    } else {
        specific
    }
}

/// Apply the configured transformation for `kind` to `url`.
#[must_use]
pub fn transform_for(config: &Config, kind: MediaKind, url: &str) -> String {
    transform_url(url, params_for(config, kind), config.transform.auto_format)
}

/// Inject `params` and then, if set, `f_auto` into `url`.
///
/// URLs without the delimiter are returned unchanged.
#[must_use]
pub fn transform_url(url: &str, params: &str, auto_format: bool) -> String {
    let mut url = url.to_owned();
    let params = params.trim().trim_matches('/');
    if !params.is_empty()
        && let Some(rewritten) = inject(&url, params)
    {
        url = rewritten;
    }
    if auto_format && let Some(rewritten) = inject(&url, AUTO_FORMAT) {
        url = rewritten;
    }
    url
}

/// Insert `segment` after the first delimiter occurrence.
fn inject(url: &str, segment: &str) -> Option<String> {
    let (base, suffix) = url.split_once(DELIMITER)?;
    Some(format!("{base}{DELIMITER}{segment}/{suffix}"))
}
