//! HTML entity decoding.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Longest entity body we look for between `&` and `;`.
const MAX_ENTITY_LEN: usize = 10;

static NAMED_ENTITIES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("quot", "\""),
        ("amp", "&"),
        ("lt", "<"),
        ("gt", ">"),
        ("apos", "'"),
        ("nbsp", " "),
    ])
});

/// Decodes HTML entities in a single left-to-right pass.
///
/// Handles `&quot; &amp; &lt; &gt; &apos; &nbsp;` plus decimal (`&#39;`) and
/// hex (`&#x27;`) numeric references. Decoded text is never scanned again,
/// so `&amp;quot;` becomes `&quot;`, not `"`. Unknown or malformed
/// entities are copied through unchanged.
#[must_use]
pub fn decode_entities(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];

        match decode_one(after) {
            Some((decoded, consumed)) => {
                out.push_str(&decoded);
                rest = &after[consumed..];
            }
            None => {
                out.push('&');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Decodes the entity at the start of `s` (just past the `&`).
///
/// Returns the replacement and the number of bytes consumed including `;`.
fn decode_one(s: &str) -> Option<(String, usize)> {
    let semi = s
        .char_indices()
        .take(MAX_ENTITY_LEN + 1)
        .find(|&(_, c)| c == ';')
        .map(|(i, _)| i)?;
    let body = &s[..semi];

    let decoded = if let Some(num) = body.strip_prefix('#') {
        decode_numeric(num)?
    } else {
        NAMED_ENTITIES.get(body)?.to_string()
    };

    Some((decoded, semi + 1))
}

fn decode_numeric(num: &str) -> Option<String> {
    let code = if let Some(hex) = num.strip_prefix(['x', 'X']) {
        u32::from_str_radix(hex, 16).ok()?
    } else {
        num.parse::<u32>().ok()?
    };
    // NUL is never valid in text
    if code == 0 {
        return None;
    }
    char::from_u32(code).map(String::from)
}
