use super::classify::{is_sharing_host, is_user_content_host};

/// Decide whether a resolved URL must bypass client-side image optimization.
///
/// The sharing provider's domains (both the sharing host and its user-content
/// subdomain) reject transformation proxies or apply their own unpredictable
/// caching, so images from them must be requested raw. The decision is a pure
/// host-pattern check with no network probing; a new problematic provider is
/// handled by extending the pattern table, not auto-detected.
pub fn requires_raw_delivery(resolved_url: &str) -> bool {
    is_sharing_host(resolved_url) || is_user_content_host(resolved_url)
}
