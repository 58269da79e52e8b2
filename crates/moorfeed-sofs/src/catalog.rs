//! Extraction of file names and upload dates from the catalog page.
//!
//! The catalog is a plain THREDDS directory listing: each NetCDF file is an
//! `<a>` anchor whose text ends in `.nc`, and the matching upload timestamp
//! sits in a `<tt>` cell as `YYYY-MM-DDThh:mm:ssZ`. Names and dates appear
//! in the same document order, so they are zipped pairwise, exactly like
//! the feed's own index generator emits them.

use std::sync::OnceLock;

use chrono::NaiveDateTime;
use regex::Regex;

use crate::error::{Error, Result};

/// Upload timestamp format used by the catalog.
pub const UPLOAD_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// One NetCDF file advertised by the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// File name as served (relative to the data directory).
    pub filename: String,
    /// When the feed uploaded the file.
    pub uploaded: NaiveDateTime,
}

fn anchor_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        #[allow(clippy::unwrap_used)] // literal pattern, checked by tests
        Regex::new(r"(?s)<a\b[^>]*>(.*?)</a>").unwrap()
    })
}

fn tag_strip_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        #[allow(clippy::unwrap_used)] // literal pattern, checked by tests
        Regex::new(r"<[^>]*>").unwrap()
    })
}

fn tt_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        #[allow(clippy::unwrap_used)] // literal pattern, checked by tests
        Regex::new(r"(?s)<tt\b[^>]*>(.*?)</tt>").unwrap()
    })
}

fn upload_date_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        #[allow(clippy::unwrap_used)] // literal pattern, checked by tests
        Regex::new(r"\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}Z").unwrap()
    })
}

/// Parses a catalog page into entries sorted by upload date (ascending).
///
/// Anchors without a date cell (parent-directory links and the like) and
/// date cells without an anchor fall off the end of the shorter list, as in
/// the feed's own listing.
///
/// # Examples
///
/// ```
/// use moorfeed_sofs::parse_catalog;
///
/// let html = r#"
///   <tr><td><a href="f1">SOFS_20240601.nc</a></td><td><tt>2024-06-02T01:00:00Z</tt></td></tr>
///   <tr><td><a href="f2">SOFS_20240531.nc</a></td><td><tt>2024-06-01T01:00:00Z</tt></td></tr>
/// "#;
/// let entries = parse_catalog(html).unwrap();
/// assert_eq!(entries.len(), 2);
/// assert_eq!(entries[0].filename, "SOFS_20240531.nc");
/// ```
pub fn parse_catalog(html: &str) -> Result<Vec<CatalogEntry>> {
    // Anchor text may itself be wrapped in markup (`<a><tt>name.nc</tt></a>`),
    // so inner tags are stripped before the `.nc` check.
    let filenames: Vec<String> = anchor_regex()
        .captures_iter(html)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .map(|inner| tag_strip_regex().replace_all(inner, "").trim().to_string())
        .filter(|text| text.ends_with(".nc"))
        .collect();

    let dates: Vec<NaiveDateTime> = tt_regex()
        .captures_iter(html)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .filter_map(|cell| upload_date_regex().find(cell).map(|m| m.as_str()))
        .map(|raw| {
            NaiveDateTime::parse_from_str(raw, UPLOAD_DATE_FORMAT)
                .map_err(|e| Error::catalog(format!("bad upload date '{raw}': {e}")))
        })
        .collect::<Result<_>>()?;

    let mut entries: Vec<CatalogEntry> = filenames
        .into_iter()
        .zip(dates)
        .map(|(filename, uploaded)| CatalogEntry { filename, uploaded })
        .collect();
    entries.sort_by_key(|e| e.uploaded);
    Ok(entries)
}

/// Selects the entries uploaded after `since` and no later than `until`.
///
/// `until` defaults to the newest upload date in the catalog, mirroring a
/// catch-up run that takes everything new.
pub fn select_unprocessed(
    entries: &[CatalogEntry],
    since: NaiveDateTime,
    until: Option<NaiveDateTime>,
) -> Vec<CatalogEntry> {
    let until = match until.or_else(|| entries.iter().map(|e| e.uploaded).max()) {
        Some(u) => u,
        None => return Vec::new(),
    };
    entries
        .iter()
        .filter(|e| e.uploaded > since && e.uploaded <= until)
        .cloned()
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const CATALOG: &str = r#"
<html><body>
<table>
<tr><td><a href="catalog.html?dataset=a"><tt>SOFS_20240531.nc</tt></a></td>
    <td><tt>2024-06-01T01:07:10Z</tt></td></tr>
<tr><td><a href="catalog.html?dataset=b"><tt>SOFS_20240601.nc</tt></a></td>
    <td><tt>2024-06-02T01:06:55Z</tt></td></tr>
<tr><td><a href="..">Parent Directory</a></td><td><tt>--</tt></td></tr>
</table>
</body></html>
"#;

    fn ts(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    // -------------------------------------------------------------------------
    // parse_catalog tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_parse_catalog_extracts_nc_anchors() {
        let entries = parse_catalog(CATALOG).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].filename, "SOFS_20240531.nc");
        assert_eq!(entries[1].filename, "SOFS_20240601.nc");
    }

    #[test]
    fn test_parse_catalog_sorts_by_upload_date() {
        // Reverse the document order; output stays date-ascending.
        let html = r#"
<a href="x">B_20240601.nc</a><tt>2024-06-02T00:00:00Z</tt>
<a href="y">A_20240531.nc</a><tt>2024-06-01T00:00:00Z</tt>
"#;
        let entries = parse_catalog(html).unwrap();
        assert_eq!(entries[0].filename, "A_20240531.nc");
    }

    #[test]
    fn test_parse_catalog_ignores_non_nc_anchors() {
        let entries = parse_catalog(CATALOG).unwrap();
        assert!(entries.iter().all(|e| e.filename.ends_with(".nc")));
    }

    #[test]
    fn test_parse_catalog_ignores_dateless_tt_cells() {
        // The "--" tt cell carries no date and must not shift the pairing.
        let entries = parse_catalog(CATALOG).unwrap();
        assert_eq!(
            entries[0].uploaded,
            NaiveDate::from_ymd_opt(2024, 6, 1)
                .unwrap()
                .and_hms_opt(1, 7, 10)
                .unwrap()
        );
    }

    #[test]
    fn test_parse_catalog_empty_page() {
        assert!(parse_catalog("<html></html>").unwrap().is_empty());
    }

    #[test]
    fn test_parse_catalog_nested_tt_in_anchor() {
        // THREDDS wraps anchor text in <tt>; the anchor regex must still
        // see the file name.
        let html = r#"<a href="z"><tt>SOFS_1.nc</tt></a><tt>2024-06-01T00:00:00Z</tt>"#;
        let entries = parse_catalog(html).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].filename, "SOFS_1.nc");
    }

    // -------------------------------------------------------------------------
    // select_unprocessed tests
    // -------------------------------------------------------------------------

    fn entry(filename: &str, uploaded: NaiveDateTime) -> CatalogEntry {
        CatalogEntry {
            filename: filename.to_string(),
            uploaded,
        }
    }

    #[test]
    fn test_select_after_since() {
        let entries = [entry("a.nc", ts(1, 0)), entry("b.nc", ts(2, 0))];
        let picked = select_unprocessed(&entries, ts(1, 0), None);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].filename, "b.nc");
    }

    #[test]
    fn test_select_respects_until() {
        let entries = [
            entry("a.nc", ts(1, 0)),
            entry("b.nc", ts(2, 0)),
            entry("c.nc", ts(3, 0)),
        ];
        let picked = select_unprocessed(&entries, ts(1, 0), Some(ts(2, 0)));
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].filename, "b.nc");
    }

    #[test]
    fn test_select_empty_catalog() {
        assert!(select_unprocessed(&[], ts(1, 0), None).is_empty());
    }

    #[test]
    fn test_select_nothing_new() {
        let entries = [entry("a.nc", ts(1, 0))];
        assert!(select_unprocessed(&entries, ts(5, 0), None).is_empty());
    }
}
