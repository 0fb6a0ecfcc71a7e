use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::DecodeError;

/// Bytes escaped when writing a token. Query-component escaping, except that
/// `.` and `~` are escaped as well since both are delimiters in a range.
const TOKEN: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_');

/// Escapes a token for the wire, writing spaces as `+`.
pub(crate) fn escape(token: &str) -> String {
    // a literal `%` is always written as `%25`, so `%20` can only come from a space
    utf8_percent_encode(token, TOKEN).to_string().replace("%20", "+")
}

/// Reverses [`escape`]. Accepts `+` as a space and rejects malformed `%` escapes.
pub(crate) fn unescape(token: &str) -> Result<String, DecodeError> {
    let bytes = token.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes.len() > i + 2
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !valid {
                let end = (i + 3).min(bytes.len());
                return Err(DecodeError::InvalidEscape(String::from_utf8_lossy(&bytes[i..end]).into_owned()));
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    let spaced = token.replace('+', " ");
    let decoded = percent_decode_str(&spaced).decode_utf8()?;
    Ok(decoded.into_owned())
}
