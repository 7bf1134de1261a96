use regex::Regex;

use crate::storage::PUBLIC_OBJECT_SEGMENT;

/// Syntactic class of a raw asset reference.
///
/// Classification looks only at the shape of the string (prefix, host, path
/// pattern) and never at network reachability, so it is safe to call on every
/// render without caching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceClass {
    /// Empty or whitespace-only reference; callers should try the next tier.
    Missing,
    /// Root-relative path served as a static asset by the site itself.
    Local,
    /// Public object-storage URL; already fetchable, never re-normalized.
    ObjectStorage,
    /// URL on the known external file-sharing provider or its user-content
    /// subdomain.
    SharedLinkExternal,
    /// Any other non-empty reference; assumed directly fetchable and passed
    /// through unchanged.
    Opaque,
}

fn sharing_host_pattern() -> &'static Regex {
    use std::sync::OnceLock;

    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)drive\.google\.com").expect("invalid sharing host regex"))
}

fn user_content_host_pattern() -> &'static Regex {
    use std::sync::OnceLock;

    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)googleusercontent\.com").expect("invalid user-content host regex")
    })
}

pub(crate) fn is_sharing_host(value: &str) -> bool {
    sharing_host_pattern().is_match(value)
}

pub(crate) fn is_user_content_host(value: &str) -> bool {
    user_content_host_pattern().is_match(value)
}

/// Classify a raw asset reference by its syntactic shape.
///
/// Classification is total: unrecognized shapes degrade to
/// [`ReferenceClass::Opaque`] rather than failing, so an unknown but valid URL
/// still renders. Object-storage URLs are checked before sharing hosts because
/// they are already resolved and must never be rewritten.
pub fn classify(reference: &str) -> ReferenceClass {
    let trimmed = reference.trim();
    if trimmed.is_empty() {
        return ReferenceClass::Missing;
    }
    if trimmed.starts_with('/') {
        return ReferenceClass::Local;
    }
    if trimmed.contains(PUBLIC_OBJECT_SEGMENT) {
        return ReferenceClass::ObjectStorage;
    }
    if is_sharing_host(trimmed) || is_user_content_host(trimmed) {
        return ReferenceClass::SharedLinkExternal;
    }
    ReferenceClass::Opaque
}

#[cfg(test)]
mod tests {
    use super::{ReferenceClass, classify};

    #[test]
    fn empty_and_whitespace_are_missing() {
        assert_eq!(classify(""), ReferenceClass::Missing);
        assert_eq!(classify("   "), ReferenceClass::Missing);
    }

    #[test]
    fn root_relative_paths_are_local() {
        assert_eq!(classify("/img/hero.jpg"), ReferenceClass::Local);
        assert_eq!(classify("/placeholder-image.svg"), ReferenceClass::Local);
    }

    #[test]
    fn public_object_urls_are_object_storage() {
        let url = "https://abc.supabase.co/storage/v1/object/public/service-images/photo.jpg";
        assert_eq!(classify(url), ReferenceClass::ObjectStorage);
    }

    #[test]
    fn sharing_links_are_external() {
        assert_eq!(
            classify("https://drive.google.com/file/d/ABC123/view"),
            ReferenceClass::SharedLinkExternal
        );
        assert_eq!(
            classify("https://drive.google.com/uc?id=XYZ"),
            ReferenceClass::SharedLinkExternal
        );
        assert_eq!(
            classify("https://lh3.googleusercontent.com/d/abc=w500"),
            ReferenceClass::SharedLinkExternal
        );
    }

    #[test]
    fn sharing_host_match_is_case_insensitive() {
        assert_eq!(
            classify("https://DRIVE.GOOGLE.COM/uc?id=XYZ"),
            ReferenceClass::SharedLinkExternal
        );
    }

    #[test]
    fn anything_else_is_opaque() {
        assert_eq!(classify("https://cdn.example.com/a.png"), ReferenceClass::Opaque);
        assert_eq!(classify("photo.jpg"), ReferenceClass::Opaque);
        assert_eq!(classify("not a url at all"), ReferenceClass::Opaque);
    }
}
