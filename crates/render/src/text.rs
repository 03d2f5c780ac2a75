use scraper::{Html, Selector};

/// Flattens rendered HTML into terminal text: body text only, one trimmed line per block.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let body = Selector::parse("body")
        .ok()
        .and_then(|selector| document.select(&selector).next());

    let full_text: String = match body {
        Some(b) => b.text().collect(),
        None => document.root_element().text().collect(),
    };

    full_text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flattens_blocks_and_skips_head() {
        let html = "<html><head><title>Ignored</title></head><body>\n<h1>Title</h1>\n\
                    <p><strong>Published:</strong> 2024/1/5</p>\n   \n<p>Escaped &amp; fine</p>\n</body></html>";
        assert_eq!(html_to_text(html), "Title\nPublished: 2024/1/5\nEscaped & fine");
    }
}
