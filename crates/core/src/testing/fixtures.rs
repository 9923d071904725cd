//! Canned page bodies shaped like the remote site's layout.

/// A well-formed item detail page.
pub fn detail_page(
    title: &str,
    magnitude: f64,
    unit: &str,
    category: &str,
    seeders: u32,
    leechers: u32,
) -> String {
    format!(
        r#"<html>
<body>
<div class="item-detail">
<h1>{title}</h1>
<dl>
<dt>Size: {magnitude} {unit}</dt>
<dt>Category: {category}</dt>
<dt>Seeders: {seeders}</dt>
<dt>Leechers: {leechers}</dt>
</dl>
</div>
</body>
</html>
"#
    )
}

/// The page the site serves for identifiers that are gone.
pub fn missing_page() -> String {
    "<html><body><p>The item you requested does not exist.</p></body></html>".to_string()
}

/// A page matching neither marker, as served during layout changes or
/// maintenance windows.
pub fn unrecognized_page() -> String {
    "<html><body><p>Scheduled maintenance, back soon.</p></body></html>".to_string()
}
