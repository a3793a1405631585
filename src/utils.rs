//! Common utility functions shared across the codebase.

use std::path::Path;

/// Render a path as a forward-slash separated string.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use tdqa::utils::normalize_path;
///
/// assert_eq!(normalize_path(Path::new("pkg\\TERADATA\\X.tbl")), "pkg/TERADATA/X.tbl");
/// assert_eq!(normalize_path(Path::new("pkg/TERADATA/X.tbl")), "pkg/TERADATA/X.tbl");
/// ```
pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Extracts the object name from an artifact path: the text between the
/// last `/` and the last `.`.
///
/// # Examples
///
/// ```
/// use tdqa::utils::object_name_from_path;
///
/// assert_eq!(
///     object_name_from_path("TERADATA/P_D_BAL_001/P_D_BAL_001_STD_0.FACT_ACCT_BALN_MNLY.tbl"),
///     "P_D_BAL_001_STD_0.FACT_ACCT_BALN_MNLY"
/// );
/// assert_eq!(object_name_from_path("X.viw"), "X");
/// ```
pub fn object_name_from_path(path: &str) -> &str {
    let start = path.rfind('/').map_or(0, |i| i + 1);
    match path.rfind('.') {
        Some(end) if end > start => &path[start..end],
        _ => &path[start..],
    }
}

/// Split text into lines on `\r\n`, `\n` or a lone `\r`.
///
/// Behaves like [`str::lines`] except that a bare carriage return also ends
/// a line. A trailing line ending does not produce an empty final line.
///
/// # Examples
///
/// ```
/// use tdqa::utils::split_lines;
///
/// let lines: Vec<_> = split_lines("CREATE\rSET\r\nTABLE\n").collect();
/// assert_eq!(lines, ["CREATE", "SET", "TABLE"]);
/// ```
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = Some(text).filter(|t| !t.is_empty());
    std::iter::from_fn(move || {
        let current = rest?;
        match current.find(['\r', '\n']) {
            Some(i) => {
                let next = if current[i..].starts_with("\r\n") { i + 2 } else { i + 1 };
                rest = Some(&current[next..]).filter(|t| !t.is_empty());
                Some(&current[..i])
            }
            None => {
                rest = None;
                Some(current)
            }
        }
    })
}
