//! Small case-insensitive HTML helpers for table scraping.
//!
//! Good enough for server-rendered report tables: no nested tables, no
//! scripts containing markup. Searches run on an ASCII-lowercased copy, which
//! keeps byte offsets aligned with the original text.

/// One element found by [`next_element`].
pub struct Element<'a> {
    /// Text between the opening tag's `>` and the closing tag.
    pub inner: &'a str,
    /// Byte offset just past the closing tag.
    pub end: usize,
}

/// Find the next `<tag ...>...</tag>` at or after `from`.
///
/// `lc` must be `s.to_ascii_lowercase()`. `tag` must be lowercase. An element
/// without a closing tag extends to the end of the input.
pub fn next_element<'a>(s: &'a str, lc: &str, tag: &str, from: usize) -> Option<Element<'a>> {
    let start = find_open_tag(lc, tag, from)?;
    let open_end = start + lc[start..].find('>')? + 1;

    let close = format!("</{}", tag);
    match lc[open_end..].find(&close) {
        Some(rel) => {
            let close_start = open_end + rel;
            let end = lc[close_start..]
                .find('>')
                .map(|p| close_start + p + 1)
                .unwrap_or(lc.len());
            Some(Element {
                inner: &s[open_end..close_start],
                end,
            })
        }
        None => Some(Element {
            inner: &s[open_end..],
            end: s.len(),
        }),
    }
}

/// Inner text of every `<tag>` element in `s`, in document order.
pub fn elements<'a>(s: &'a str, tag: &str) -> Vec<&'a str> {
    let lc = s.to_ascii_lowercase();
    let mut out = Vec::new();
    let mut pos = 0;
    while let Some(el) = next_element(s, &lc, tag, pos) {
        out.push(el.inner);
        pos = el.end;
    }
    out
}

/// Inner text of the first `<tag>` element in `s`.
pub fn first_element<'a>(s: &'a str, tag: &str) -> Option<&'a str> {
    let lc = s.to_ascii_lowercase();
    next_element(s, &lc, tag, 0).map(|el| el.inner)
}

/// Offset of `<tag` followed by `>`, `/` or whitespace, so `<th` never
/// matches `<thead`.
fn find_open_tag(lc: &str, tag: &str, from: usize) -> Option<usize> {
    let needle = format!("<{}", tag);
    let mut pos = from;
    loop {
        let found = pos + lc.get(pos..)?.find(&needle)?;
        let after = found + needle.len();
        match lc.as_bytes().get(after) {
            Some(b'>') | Some(b'/') => return Some(found),
            Some(b) if b.is_ascii_whitespace() => return Some(found),
            None => return None,
            _ => pos = after,
        }
    }
}

/// Visible text of an HTML fragment: tags removed, common entities decoded,
/// whitespace collapsed and trimmed.
pub fn text(fragment: &str) -> String {
    let mut out = String::with_capacity(fragment.len());
    let mut in_tag = false;

    for ch in fragment.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }

    let decoded = decode_entities(&out);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    s.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#039;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn th_does_not_match_thead() {
        let html = "<THEAD><tr><TH class=\"x\">Name</th><th>Status</th></tr></thead>";
        assert_eq!(elements(html, "th"), vec!["Name", "Status"]);
        assert!(first_element(html, "thead").is_some());
    }

    #[test]
    fn text_strips_tags_and_entities() {
        assert_eq!(text("  <b>Tower&nbsp;A</b>\n &amp; <i>B</i> "), "Tower A & B");
        assert_eq!(text("<span></span>"), "");
    }

    #[test]
    fn unclosed_element_runs_to_end() {
        assert_eq!(first_element("<td>open", "td"), Some("open"));
    }

    #[test]
    fn missing_element_is_none() {
        assert!(first_element("<div>no table</div>", "table").is_none());
    }
}
