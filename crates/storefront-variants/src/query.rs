//! `application/x-www-form-urlencoded` query strings, encoded the way
//! browsers serialize `URLSearchParams`.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Bytes left unescaped by the form-urlencoded serializer besides ASCII
/// alphanumerics. Space is handled separately (encoded as `+`).
const FORM_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'*')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_');

/// Splits a query string into decoded key/value pairs, in order.
///
/// A leading `?` is ignored, empty segments are skipped, and a segment with
/// no `=` yields an empty value. Duplicate keys are all returned.
#[must_use]
pub fn parse_query(query: &str) -> Vec<(String, String)> {
    query
        .strip_prefix('?')
        .unwrap_or(query)
        .split('&')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let (key, value) = segment.split_once('=').unwrap_or((segment, ""));
            (decode_component(key), decode_component(value))
        })
        .collect()
}

/// Serializes pairs into a query string without a leading `?`.
#[must_use]
pub fn encode_query<K, V>(pairs: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    pairs
        .iter()
        .map(|(k, v)| {
            format!(
                "{}={}",
                encode_component(k.as_ref()),
                encode_component(v.as_ref())
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

fn encode_component(raw: &str) -> String {
    raw.split(' ')
        .map(|part| utf8_percent_encode(part, FORM_VALUE).to_string())
        .collect::<Vec<_>>()
        .join("+")
}
