//! Extension and content-type helpers.

use mime::Mime;

/// Content type used when an extension is unknown.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Extension of the filename: everything after the first `.`.
///
/// `photo.tar.gz` yields `tar.gz`. Extensions become part of storage keys,
/// so only ASCII alphanumeric segments separated by single dots are kept.
/// When the full tail is not safe, the segment after the last `.` is tried.
/// Names without a usable extension have none.
#[must_use]
pub fn extension_of(filename: &str) -> Option<&str> {
    let (_, full) = filename.split_once('.')?;
    if is_safe_extension(full) {
        return Some(full);
    }
    filename
        .rsplit_once('.')
        .map(|(_, last)| last)
        .filter(|last| is_safe_extension(last))
}

fn is_safe_extension(ext: &str) -> bool {
    !ext.is_empty()
        && ext
            .split('.')
            .all(|segment| !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_alphanumeric()))
}

/// Content type for an extension, looked up by its last segment.
#[must_use]
pub fn content_type_for(extension: &str) -> Mime {
    let last = extension.rsplit('.').next().unwrap_or(extension);
    mime_guess::from_ext(last).first_or_octet_stream()
}

/// Whether the extension maps to an `image/*` type.
#[must_use]
pub fn is_image(extension: &str) -> bool {
    content_type_for(extension).type_() == mime::IMAGE
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("jpg", "image/jpeg")]
    #[case("jpeg", "image/jpeg")]
    #[case("JPG", "image/jpeg")]
    #[case("png", "image/png")]
    #[case("gif", "image/gif")]
    #[case("txt", "text/plain")]
    #[case("pdf", "application/pdf")]
    #[case("v2.pdf", "application/pdf")]
    fn test_known_content_types(#[case] ext: &str, #[case] expected: &str) {
        assert_eq!(content_type_for(ext).essence_str(), expected);
    }

    #[rstest]
    #[case("qqqzz")]
    #[case("")]
    #[case("weird-ext-123")]
    fn test_unknown_falls_back(#[case] ext: &str) {
        assert_eq!(content_type_for(ext).essence_str(), DEFAULT_CONTENT_TYPE);
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("avatar.png"), Some("png"));
        assert_eq!(extension_of("backup.tar.gz"), Some("tar.gz"));
        assert_eq!(extension_of("README"), None);
        assert_eq!(extension_of("trailing."), None);
        assert_eq!(extension_of(".env"), Some("env"));
    }

    #[rstest]
    #[case("x./../../escaped.txt", Some("txt"))]
    #[case("notes.v#1.txt", Some("txt"))]
    #[case("a.png?x-oss-process=style/big", None)]
    #[case("a.b/c", None)]
    #[case("evil./..", None)]
    #[case("a..b", Some("b"))]
    #[case("photo.JPG", Some("JPG"))]
    #[case("clip.mp4 ", None)]
    fn test_extension_of_unsafe_names(#[case] filename: &str, #[case] expected: Option<&str>) {
        assert_eq!(extension_of(filename), expected);
    }

    #[test]
    fn test_is_image() {
        assert!(is_image("png"));
        assert!(is_image("jpeg"));
        assert!(!is_image("pdf"));
        assert!(!is_image("unknownext"));
    }
}
