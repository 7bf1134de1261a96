use regex::Regex;

use super::classify::{ReferenceClass, is_user_content_host};

/// Direct-content endpoint used for every normalized sharing-host link.
///
/// The provider exposes several fetch endpoints with drifting behavior; the
/// thumbnail endpoint is the one that reliably serves image bytes to browsers
/// without an interstitial, so it is the canonical form here.
const DIRECT_CONTENT_ENDPOINT: &str = "https://drive.google.com/thumbnail";

/// Width hint attached to every canonical direct-content URL.
const DIRECT_CONTENT_SIZE: &str = "w1000";

fn query_id_pattern() -> &'static Regex {
    use std::sync::OnceLock;

    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[?&]id=([^&#]+)").expect("invalid id query regex"))
}

fn path_id_pattern() -> &'static Regex {
    use std::sync::OnceLock;

    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"/d/([A-Za-z0-9_-]+)").expect("invalid id path regex"))
}

/// Extract the share identifier embedded in a sharing-host URL.
///
/// Two shapes carry an id: the `uc?id=<ID>` query form and the
/// `/file/d/<ID>/view` path form. When a malformed input matches both, the
/// query form wins because it is unambiguous.
fn extract_share_id(url: &str) -> Option<&str> {
    if let Some(captures) = query_id_pattern().captures(url) {
        return captures.get(1).map(|id| id.as_str());
    }
    path_id_pattern().captures(url).and_then(|captures| captures.get(1)).map(|id| id.as_str())
}

/// Rewrite a classified reference into a directly fetchable URL.
///
/// Local, object-storage, and opaque references are already fetchable and pass
/// through unchanged. Sharing-host links are rewritten onto the canonical
/// direct-content endpoint; `None` signals that no identifier could be
/// extracted and the caller should try the next tier. Normalizing an
/// already-canonical URL a second time is a no-op.
pub fn normalize_reference(reference: &str, class: ReferenceClass) -> Option<String> {
    match class {
        ReferenceClass::Missing => None,
        ReferenceClass::Local | ReferenceClass::ObjectStorage | ReferenceClass::Opaque => {
            Some(reference.trim().to_string())
        }
        ReferenceClass::SharedLinkExternal => normalize_shared_link(reference.trim()),
    }
}

fn normalize_shared_link(url: &str) -> Option<String> {
    // The user-content subdomain serves bytes directly; its `/d/<id>` paths
    // are not share links and must not be rewritten onto the sharing host.
    if is_user_content_host(url) {
        return Some(url.to_string());
    }
    if let Some(id) = extract_share_id(url) {
        return Some(format!("{DIRECT_CONTENT_ENDPOINT}?id={id}&sz={DIRECT_CONTENT_SIZE}"));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::super::classify::classify;
    use super::normalize_reference;

    fn normalize(reference: &str) -> Option<String> {
        normalize_reference(reference, classify(reference))
    }

    #[test]
    fn local_paths_pass_through() {
        assert_eq!(normalize("/img/x.jpg"), Some("/img/x.jpg".to_string()));
    }

    #[test]
    fn object_storage_urls_pass_through() {
        let url = "https://abc.supabase.co/storage/v1/object/public/service-images/a.jpg";
        assert_eq!(normalize(url), Some(url.to_string()));
    }

    #[test]
    fn opaque_urls_pass_through() {
        let url = "https://cdn.example.com/banner.png";
        assert_eq!(normalize(url), Some(url.to_string()));
    }

    #[test]
    fn view_links_rewrite_to_direct_content() {
        assert_eq!(
            normalize("https://drive.google.com/file/d/ABC123/view"),
            Some("https://drive.google.com/thumbnail?id=ABC123&sz=w1000".to_string())
        );
    }

    #[test]
    fn query_links_rewrite_to_direct_content() {
        assert_eq!(
            normalize("https://drive.google.com/uc?id=XYZ"),
            Some("https://drive.google.com/thumbnail?id=XYZ&sz=w1000".to_string())
        );
    }

    #[test]
    fn query_form_wins_when_both_shapes_match() {
        let mixed = "https://drive.google.com/file/d/PATHID/view?id=QUERYID";
        assert_eq!(
            normalize(mixed),
            Some("https://drive.google.com/thumbnail?id=QUERYID&sz=w1000".to_string())
        );
    }

    #[test]
    fn sharing_link_without_id_is_unresolvable() {
        assert_eq!(normalize("https://drive.google.com/drive/my-drive"), None);
    }

    #[test]
    fn user_content_urls_pass_through() {
        let url = "https://lh3.googleusercontent.com/d/abc=w500";
        assert_eq!(normalize(url), Some(url.to_string()));
    }

    #[test]
    fn normalization_is_idempotent() {
        let once = normalize("https://drive.google.com/file/d/ABC123/view").unwrap();
        let twice = normalize(&once).unwrap();
        assert_eq!(once, twice);

        let local = normalize("/img/x.jpg").unwrap();
        assert_eq!(normalize(&local).unwrap(), local);
    }
}
