//! Shortened artifact identities.

/// Root markers used when none are configured.
pub const DEFAULT_ROOT_MARKERS: &[&str] = &["TERADATA", "DBAI"];

/// Shorten an artifact path for reporting.
///
/// Markers are applied in order: when the current identity contains a
/// marker, it is cut to start one character before the marker's first
/// occurrence (so the leading separator is kept), or at the marker itself
/// when it is at the very start.
///
/// ```
/// use tdqa::core::shorten_identity;
///
/// let markers = ["TERADATA".to_string(), "DBAI".to_string()];
/// assert_eq!(
///     shorten_identity("pkg/EXTRACTED/TERADATA/P_D/X.tbl", &markers),
///     "/TERADATA/P_D/X.tbl"
/// );
/// assert_eq!(shorten_identity("other/X.tbl", &markers), "other/X.tbl");
/// ```
pub fn shorten_identity<S: AsRef<str>>(path: &str, markers: &[S]) -> String {
    let mut identity = path;
    for marker in markers {
        let marker = marker.as_ref();
        if marker.is_empty() {
            continue;
        }
        if let Some(index) = identity.find(marker) {
            let start = previous_char_boundary(identity, index);
            identity = &identity[start..];
        }
    }
    identity.to_string()
}

fn previous_char_boundary(text: &str, index: usize) -> usize {
    text[..index]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}
