//! Shared URL/form parsing and response helpers for route handlers.

use serde::Serialize;

/// Parse URL-encoded form body into key-value pairs.
/// Handles `key=value&key2=value2` format.
pub fn parse_form_body(body: &str) -> Vec<(String, String)> {
    if body.is_empty() {
        return Vec::new();
    }
    body.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let mut parts = pair.splitn(2, '=');
            let key = parts.next().unwrap_or("");
            let val = parts.next().unwrap_or("");
            (percent_decode(key), percent_decode(val))
        })
        .collect()
}

/// Percent-decode a URL-encoded value. Decoded bytes are reassembled as
/// UTF-8, so multi-byte names survive (`Zo%C3%AB` → `Zoë`).
pub fn percent_decode(input: &str) -> String {
    let mut bytes = Vec::with_capacity(input.len());
    let mut iter = input.bytes();
    while let Some(b) = iter.next() {
        match b {
            b'%' => {
                let hi = iter.next();
                let lo = iter.next();
                match (hi, lo) {
                    (Some(hi), Some(lo)) => match hex_pair(hi, lo) {
                        Some(val) => bytes.push(val),
                        None => bytes.extend_from_slice(&[b'%', hi, lo]),
                    },
                    (Some(hi), None) => bytes.extend_from_slice(&[b'%', hi]),
                    _ => bytes.push(b'%'),
                }
            }
            b'+' => bytes.push(b' '),
            _ => bytes.push(b),
        }
    }
    String::from_utf8_lossy(&bytes).into_owned()
}

fn hex_pair(hi: u8, lo: u8) -> Option<u8> {
    let hi = (hi as char).to_digit(16)?;
    let lo = (lo as char).to_digit(16)?;
    Some((hi * 16 + lo) as u8)
}

/// Parse a query string into key-value pairs.
pub fn parse_query(query: &str) -> Vec<(String, String)> {
    let q = query.strip_prefix('?').unwrap_or(query);
    parse_form_body(q)
}

/// Helper to get a value by key from a list of key-value pairs.
pub fn get_param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// All values for `key`, accepting both `key=` and `key[]=`.
pub fn get_all<'a>(params: &'a [(String, String)], key: &str) -> Vec<&'a str> {
    let bracket_key = format!("{}[]", key);
    params
        .iter()
        .filter(|(k, _)| k == key || *k == bracket_key)
        .map(|(_, v)| v.as_str())
        .collect()
}

/// Serialize a response body. Falls back to a JSON error string.
pub fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| json_error(&e.to_string()))
}

/// `{"error": message}`
pub fn json_error(message: &str) -> String {
    serde_json::json!({ "error": message }).to_string()
}
