//! HTML entity unescaping for raw token payloads.

use std::borrow::Cow;

/// Decode HTML entities in `raw`.
///
/// Covers the named entities markdown payloads actually carry plus decimal
/// and hexadecimal numeric references. Unrecognized sequences pass through
/// verbatim. Entity-free input borrows.
pub(crate) fn unescape(raw: &str) -> Cow<'_, str> {
    if !raw.contains('&') {
        return Cow::Borrowed(raw);
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        match decode_entity(rest) {
            Some((decoded, consumed)) => {
                out.push(decoded);
                rest = &rest[consumed..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// Decode one entity at the start of `s` (which begins with `&`).
/// Returns the decoded character and the byte length consumed.
fn decode_entity(s: &str) -> Option<(char, usize)> {
    // Longest recognized body is a 6-digit hex reference.
    let semi = s[1..].find(';').filter(|len| *len <= 8)? + 1;
    let body = &s[1..semi];
    let decoded = if let Some(reference) = body.strip_prefix('#') {
        let code = match reference.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => reference.parse::<u32>().ok()?,
        };
        char::from_u32(code)?
    } else {
        match body {
            "amp" => '&',
            "lt" => '<',
            "gt" => '>',
            "quot" => '"',
            "apos" => '\'',
            "nbsp" => '\u{a0}',
            _ => return None,
        }
    };
    Some((decoded, semi + 1))
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use pretty_assertions::assert_eq;

    use super::unescape;

    #[test]
    fn entity_free_input_borrows() {
        assert!(matches!(unescape("plain text"), Cow::Borrowed(_)));
    }

    #[test]
    fn decodes_named_entities() {
        assert_eq!(unescape("AT&amp;T"), "AT&T");
        assert_eq!(unescape("&lt;tag&gt;"), "<tag>");
        assert_eq!(unescape("&quot;q&quot; &apos;a&apos;"), "\"q\" 'a'");
    }

    #[test]
    fn decodes_numeric_references() {
        assert_eq!(unescape("&#39;"), "'");
        assert_eq!(unescape("&#x27;"), "'");
        assert_eq!(unescape("&#x1F600;"), "\u{1F600}");
    }

    #[test]
    fn unknown_sequences_pass_through() {
        assert_eq!(unescape("&unknown; & co"), "&unknown; & co");
        assert_eq!(unescape("&#xzz;"), "&#xzz;");
        assert_eq!(unescape("trailing &"), "trailing &");
    }
}
