//! Item detail page parser.
//!
//! Pure function over page text; callers own persistence. The extraction
//! walks a filtered line set (tags stripped, entities decoded, blanks
//! dropped) in fixed positional order: title, size pair, category label,
//! seeder count, leecher count.

use once_cell::sync::Lazy;
use regex_lite::Regex;

use super::size::to_kib;
use super::types::{ListedItem, PageOutcome};

/// Marker present on every item detail page.
const DETAIL_MARKER: &str = "class=\"item-detail\"";

/// Marker present on the page served for identifiers that are gone.
const MISSING_MARKER: &str = "The item you requested does not exist";

static SIZE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Size:\s*([0-9]+(?:\.[0-9]+)?)\s*([A-Za-z]*)").unwrap());
static CATEGORY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^Category:\s*(.+)$").unwrap());
static SEEDERS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^Seeders:\s*([0-9]+)").unwrap());
static LEECHERS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^Leechers:\s*([0-9]+)").unwrap());

/// Parse one fetched item detail page.
///
/// `Found` requires the detail marker and a complete field set;
/// `NotFound` requires the missing-item marker; anything else is
/// `Unrecognized`, meaning the page layout has diverged from what this
/// parser expects.
pub fn parse_item_page(body: &str) -> PageOutcome {
    if body.contains(DETAIL_MARKER) {
        return match extract_fields(body) {
            Some(item) => PageOutcome::Found(item),
            None => PageOutcome::Unrecognized,
        };
    }

    if body.contains(MISSING_MARKER) {
        return PageOutcome::NotFound;
    }

    PageOutcome::Unrecognized
}

fn extract_fields(body: &str) -> Option<ListedItem> {
    let lines: Vec<&str> = body.lines().collect();
    let marker_idx = lines.iter().position(|l| l.contains(DETAIL_MARKER))?;

    let filtered: Vec<String> = lines[marker_idx..]
        .iter()
        .map(|l| strip_tags(l))
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect();

    // Each scan resumes where the previous one stopped, so the fields
    // must appear in order.
    let mut cursor = filtered.iter();

    let title = cursor.next()?.clone();

    let size_caps = cursor.find_map(|l| SIZE_RE.captures(l))?;
    let magnitude: f64 = size_caps.get(1)?.as_str().parse().ok()?;
    let unit = size_caps.get(2)?.as_str();
    let size_kib = to_kib(magnitude, unit);

    let category = cursor
        .find_map(|l| CATEGORY_RE.captures(l))?
        .get(1)?
        .as_str()
        .trim()
        .to_string();

    let seeders: u32 = cursor
        .find_map(|l| SEEDERS_RE.captures(l))?
        .get(1)?
        .as_str()
        .parse()
        .ok()?;

    let leechers: u32 = cursor
        .find_map(|l| LEECHERS_RE.captures(l))?
        .get(1)?
        .as_str()
        .parse()
        .ok()?;

    Some(ListedItem {
        title,
        size_kib,
        category,
        seeders,
        leechers,
    })
}

/// Drop markup tags from a line and decode the handful of entities the
/// site emits in titles and labels.
fn strip_tags(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut in_tag = false;
    for ch in line.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    decode_entities(&out)
}

fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[test]
    fn test_parses_detail_page() {
        let body = fixtures::detail_page("Ubuntu 24.04 Desktop ISO", 2.5, "GiB", "Software", 12, 3);

        let outcome = parse_item_page(&body);
        let PageOutcome::Found(item) = outcome else {
            panic!("expected Found, got {outcome:?}");
        };

        assert_eq!(item.title, "Ubuntu 24.04 Desktop ISO");
        assert_eq!(item.size_kib, 2.5 * 1024.0 * 1024.0);
        assert_eq!(item.category, "Software");
        assert_eq!(item.seeders, 12);
        assert_eq!(item.leechers, 3);
    }

    #[test]
    fn test_size_normalized_from_bytes() {
        let body = fixtures::detail_page("Tiny", 500.0, "Bytes", "Other", 1, 0);

        let PageOutcome::Found(item) = parse_item_page(&body) else {
            panic!("expected Found");
        };
        assert_eq!(item.size_kib, 500.0 / 1024.0);
    }

    #[test]
    fn test_entities_decoded_in_title() {
        let body = fixtures::detail_page("Tom &amp; Jerry &#39;98", 10.0, "MiB", "Video", 2, 1);

        let PageOutcome::Found(item) = parse_item_page(&body) else {
            panic!("expected Found");
        };
        assert_eq!(item.title, "Tom & Jerry '98");
    }

    #[test]
    fn test_missing_item_page() {
        assert_eq!(parse_item_page(&fixtures::missing_page()), PageOutcome::NotFound);
    }

    #[test]
    fn test_unrelated_page_is_unrecognized() {
        assert_eq!(
            parse_item_page("<html><body>maintenance window</body></html>"),
            PageOutcome::Unrecognized
        );
        assert_eq!(parse_item_page(""), PageOutcome::Unrecognized);
    }

    #[test]
    fn test_detail_marker_without_fields_is_unrecognized() {
        let body = r#"<div class="item-detail"><h1>Title only</h1></div>"#;
        assert_eq!(parse_item_page(body), PageOutcome::Unrecognized);
    }

    #[test]
    fn test_fields_out_of_order_are_unrecognized() {
        let body = concat!(
            "<div class=\"item-detail\">\n",
            "<h1>Oddly laid out</h1>\n",
            "<dt>Seeders: 4</dt>\n",
            "<dt>Size: 1.0 GiB</dt>\n",
            "<dt>Category: Software</dt>\n",
            "<dt>Leechers: 2</dt>\n",
            "</div>\n",
        );
        // The seeder count precedes the size pair, so the positional walk
        // cannot complete.
        assert_eq!(parse_item_page(body), PageOutcome::Unrecognized);
    }

    #[test]
    fn test_unrecognized_unit_kept_as_kib() {
        let body = fixtures::detail_page("Odd unit", 42.0, "MB", "Other", 1, 0);

        let PageOutcome::Found(item) = parse_item_page(&body) else {
            panic!("expected Found");
        };
        assert_eq!(item.size_kib, 42.0);
    }
}
