//! Low-level HTML scanning helpers.
//!
//! Tailored to the contribution calendar markup: a forward scan over opening
//! tags with their attributes, plus text extraction for simple elements.
//! Tag and attribute names compare ASCII case-insensitively.

/// An opening tag found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag<'a> {
    /// Tag name as written in the source
    pub name: &'a str,
    /// Attributes in source order; valueless attributes have an empty value
    pub attrs: Vec<(&'a str, &'a str)>,
    /// Byte offset of the `<`
    pub start: usize,
    /// Byte offset just past the closing `>`
    pub end: usize,
}

impl<'a> Tag<'a> {
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Value of the first attribute with the given name.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.attrs
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| *value)
    }

    /// Whether the `class` attribute contains the given fragment.
    pub fn has_class_fragment(&self, fragment: &str) -> bool {
        self.attr("class")
            .map(|class| class.contains(fragment))
            .unwrap_or(false)
    }
}

/// Iterate over every opening tag in `html`, in document order.
///
/// Closing tags, comments and declarations are skipped.
pub fn tags(html: &str) -> Tags<'_> {
    Tags { html, pos: 0 }
}

pub struct Tags<'a> {
    html: &'a str,
    pos: usize,
}

impl<'a> Iterator for Tags<'a> {
    type Item = Tag<'a>;

    fn next(&mut self) -> Option<Tag<'a>> {
        let html = self.html;
        let bytes = html.as_bytes();
        loop {
            let start = html.get(self.pos..)?.find('<')? + self.pos;
            self.pos = start + 1;

            if html[start..].starts_with("<!--") {
                self.pos = match html[start..].find("-->") {
                    Some(rel) => start + rel + 3,
                    None => html.len(),
                };
                continue;
            }

            let name_start = start + 1;
            let name_end = scan_while(bytes, name_start, |b| b.is_ascii_alphanumeric() || b == b'-');
            if name_end == name_start || !bytes[name_start].is_ascii_alphabetic() {
                continue;
            }

            match parse_attrs(html, name_end) {
                Some((attrs, end)) => {
                    self.pos = end;
                    return Some(Tag {
                        name: &html[name_start..name_end],
                        attrs,
                        start,
                        end,
                    });
                }
                // malformed or unterminated tag: resume after its `<`
                None => {
                    self.pos = start + 1;
                    continue;
                }
            }
        }
    }
}

/// Parse attributes starting right after the tag name.
/// Returns the attributes and the offset just past the closing `>`.
fn parse_attrs(html: &str, mut pos: usize) -> Option<(Vec<(&str, &str)>, usize)> {
    let bytes = html.as_bytes();
    let mut attrs = Vec::new();

    loop {
        pos = scan_while(bytes, pos, |b| b.is_ascii_whitespace());
        match bytes.get(pos)? {
            b'>' => return Some((attrs, pos + 1)),
            b'/' => {
                pos += 1;
                continue;
            }
            _ => {}
        }

        let key_start = pos;
        pos = scan_while(bytes, pos, |b| {
            !b.is_ascii_whitespace() && b != b'=' && b != b'>' && b != b'/'
        });
        let key = &html[key_start..pos];

        pos = scan_while(bytes, pos, |b| b.is_ascii_whitespace());
        if bytes.get(pos) != Some(&b'=') {
            attrs.push((key, ""));
            continue;
        }
        pos = scan_while(bytes, pos + 1, |b| b.is_ascii_whitespace());

        let value = match bytes.get(pos)? {
            quote @ (b'"' | b'\'') => {
                let value_start = pos + 1;
                let value_end = html[value_start..].find(*quote as char)? + value_start;
                pos = value_end + 1;
                &html[value_start..value_end]
            }
            _ => {
                let value_start = pos;
                pos = scan_while(bytes, pos, |b| !b.is_ascii_whitespace() && b != b'>');
                &html[value_start..pos]
            }
        };
        attrs.push((key, value));
    }
}

fn scan_while(bytes: &[u8], mut pos: usize, pred: impl Fn(u8) -> bool) -> usize {
    while pos < bytes.len() && pred(bytes[pos]) {
        pos += 1;
    }
    pos
}

/// Text content of the element opened by `tag`, up to its closing tag.
///
/// Nested markup is stripped, entities decoded and whitespace collapsed.
/// Returns `None` when the closing tag is missing.
pub fn element_text(html: &str, tag: &Tag<'_>) -> Option<String> {
    let close = format!("</{}", tag.name.to_ascii_lowercase());
    let rest = &html[tag.end..];
    let close_rel = find_ci(rest, &close)?;
    Some(normalize_ws(&decode_entities(&strip_tags(&rest[..close_rel]))))
}

/// Case-insensitive (ASCII) substring search.
pub fn find_ci(haystack: &str, needle: &str) -> Option<usize> {
    let hay = haystack.as_bytes();
    let needle = needle.as_bytes();
    if needle.is_empty() {
        return Some(0);
    }
    hay.windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle))
}

/// Remove all `<...>` tags from the string.
pub fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

/// Decode the handful of entities that appear in tooltip text.
pub fn decode_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&amp;", "&")
}

/// Collapse runs of whitespace into single spaces and trim.
pub fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
