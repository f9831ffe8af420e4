//! Helpers for CQ-code formatted message strings.
//!
//! Hosts speaking the string message format embed rich segments inline as
//! `[CQ:type,key=value,...]`. Plain text around them escapes `&`, `[` and `]`;
//! parameter values additionally escape `,`.

/// A single `[CQ:...]` code found in a message string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CqCode<'a> {
    /// Segment type, e.g. `at` or `image`.
    pub kind: &'a str,
    /// Raw (still escaped) `key=value` parameters in order.
    pub params: Vec<(&'a str, &'a str)>,
}

impl<'a> CqCode<'a> {
    /// Returns the raw value of the parameter `key`, if present.
    pub fn get(&self, key: &str) -> Option<&'a str> {
        self.params.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }
}

/// Escapes text for embedding in a message string.
///
/// With `in_param` set, commas are escaped too so the result can be used as a
/// CQ-code parameter value.
pub fn escape(text: &str, in_param: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '[' => out.push_str("&#91;"),
            ']' => out.push_str("&#93;"),
            ',' if in_param => out.push_str("&#44;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Reverses [`escape`].
pub fn unescape(text: &str) -> String {
    text.replace("&#44;", ",")
        .replace("&#91;", "[")
        .replace("&#93;", "]")
        .replace("&amp;", "&")
}

/// Renders a mention of `user_id`.
pub fn at(user_id: i64) -> String {
    format!("[CQ:at,qq={user_id}]")
}

/// Iterates over every well-formed CQ code in `text`.
pub fn codes(text: &str) -> impl Iterator<Item = CqCode<'_>> {
    let mut rest = text;
    std::iter::from_fn(move || {
        loop {
            let start = rest.find("[CQ:")?;
            let body_start = start + 4;
            let Some(len) = rest[body_start..].find(']') else {
                rest = "";
                return None;
            };
            let body = &rest[body_start..body_start + len];
            rest = &rest[body_start + len + 1..];

            let mut parts = body.split(',');
            let kind = parts.next().unwrap_or_default();
            if kind.is_empty() {
                continue;
            }
            let params = parts.filter_map(|p| p.split_once('=')).collect();
            return Some(CqCode { kind, params });
        }
    })
}

/// Returns `true` if `text` mentions `user_id` with an `at` code.
pub fn is_at(text: &str, user_id: i64) -> bool {
    let id = user_id.to_string();
    codes(text).any(|c| c.kind == "at" && c.get("qq") == Some(id.as_str()))
}

/// Removes every CQ code and unescapes what is left.
pub fn strip_codes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("[CQ:") {
        out.push_str(&rest[..start]);
        match rest[start..].find(']') {
            Some(end) => rest = &rest[start + end + 1..],
            None => {
                rest = &rest[start..];
                break;
            }
        }
    }
    out.push_str(rest);
    unescape(&out)
}
