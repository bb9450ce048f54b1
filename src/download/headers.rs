//! File naming and download header values.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters `encodeURIComponent` leaves alone.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Normalized image type and the extension that goes with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageKind {
    pub mime: &'static str,
    pub extension: &'static str,
}

/// Map an upstream `Content-Type` onto png, webp, gif or jpeg.
pub fn normalize_image_type(content_type: Option<&str>) -> ImageKind {
    let base = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|ct| ct.trim().to_ascii_lowercase())
        .unwrap_or_default();

    if base.contains("png") {
        ImageKind { mime: "image/png", extension: "png" }
    } else if base.contains("webp") {
        ImageKind { mime: "image/webp", extension: "webp" }
    } else if base.contains("gif") {
        ImageKind { mime: "image/gif", extension: "gif" }
    } else {
        ImageKind { mime: "image/jpeg", extension: "jpg" }
    }
}

/// Keep only `[A-Za-z0-9_-]`; an empty result becomes `image`.
pub fn sanitize_id(id: &str) -> String {
    let kept: String = id
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect();
    if kept.is_empty() {
        "image".to_string()
    } else {
        kept
    }
}

/// `<source>-<id>.<ext>` for an image download.
pub fn image_filename(source: &str, id: Option<&str>, extension: &str) -> String {
    format!("{}-{}.{}", source, sanitize_id(id.unwrap_or_default()), extension)
}

/// `Content-Disposition` with both an RFC 5987 and a plain filename.
pub fn encoded_attachment(filename: &str) -> String {
    format!(
        "attachment; filename*=UTF-8''{}; filename=\"{}\"",
        utf8_percent_encode(filename, COMPONENT),
        filename.replace('"', "")
    )
}

/// Plain `Content-Disposition` for media pass-through.
pub fn attachment(filename: &str) -> String {
    format!("attachment; filename=\"{}\"", filename.replace('"', ""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_type_normalization() {
        assert_eq!(normalize_image_type(Some("image/png; charset=binary")).extension, "png");
        assert_eq!(normalize_image_type(Some("image/WEBP")).mime, "image/webp");
        assert_eq!(normalize_image_type(Some("image/gif")).extension, "gif");
        assert_eq!(normalize_image_type(Some("image/avif")).mime, "image/jpeg");
        assert_eq!(normalize_image_type(None).extension, "jpg");
    }

    #[test]
    fn filenames() {
        assert_eq!(image_filename("unsplash", Some("photo-15093/16975"), "jpg"), "unsplash-photo-1509316975.jpg");
        assert_eq!(image_filename("pexels", Some("../.."), "png"), "pexels-image.png");
        assert_eq!(image_filename("pexels", None, "png"), "pexels-image.png");
    }

    #[test]
    fn disposition_values() {
        assert_eq!(
            encoded_attachment("unsplash-a b.jpg"),
            "attachment; filename*=UTF-8''unsplash-a%20b.jpg; filename=\"unsplash-a b.jpg\""
        );
        assert_eq!(attachment("clip.mp4"), "attachment; filename=\"clip.mp4\"");
    }
}
