//! `sitemap.xml` and `robots.txt`.
//!
//! Both files are pure functions of the base URL and the page list, so they
//! go through the build ledger like any page and stay byte-identical across
//! rebuilds. No `<lastmod>` is emitted for the same reason.

/// A `urlset` of absolute URLs, sorted and de-duplicated.
pub fn sitemap_xml(base_url: &str, urls: &[&str]) -> String {
    let base = base_url.trim_end_matches('/');
    let mut sorted: Vec<&str> = urls.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for url in sorted {
        xml.push_str("  <url><loc>");
        xml.push_str(&escape_xml(&format!("{base}{url}")));
        xml.push_str("</loc></url>\n");
    }
    xml.push_str("</urlset>\n");
    xml
}

/// Allow everything and point crawlers at the sitemap.
pub fn robots_txt(base_url: &str) -> String {
    format!(
        "User-agent: *\nAllow: /\n\nSitemap: {}/sitemap.xml\n",
        base_url.trim_end_matches('/')
    )
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
