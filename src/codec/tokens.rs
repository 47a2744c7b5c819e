// Token tables: control-byte -> string compression for repeated text

use std::collections::BTreeMap;

use regex::Regex;

use crate::error::{BinaryError, Result};

use super::element::Element;

lazy_static::lazy_static! {
    // Control bytes eligible for substitution: 0x01-0x13 minus the
    // whitespace controls 0x09, 0x0a and 0x0d.
    static ref TOKEN_PATTERN: Regex =
        Regex::new("[\\x01-\\x08\\x0b\\x0c\\x0e-\\x13]").unwrap();
}

/// Mapping from control bytes to their replacement strings.
pub type TokenTable = BTreeMap<u8, String>;

/// Decode a token table payload: repeated `token(8) len(8) utf8[len]`.
pub fn decode_token_table(payload: &[u8]) -> Result<TokenTable> {
    let mut tokens = TokenTable::new();
    let mut rest = payload;
    while !rest.is_empty() {
        if rest.len() < 2 {
            return Err(BinaryError::TruncatedInput {
                needed: 16,
                available: rest.len() * 8,
            });
        }
        let token = rest[0];
        let length = rest[1] as usize;
        if rest.len() < 2 + length {
            return Err(BinaryError::TruncatedInput {
                needed: (2 + length) * 8,
                available: rest.len() * 8,
            });
        }
        let text = String::from_utf8(rest[2..2 + length].to_vec())?;
        tokens.insert(token, text);
        rest = &rest[2 + length..];
    }
    Ok(tokens)
}

/// Encode a token table into its wire payload.
pub fn encode_token_table(tokens: &TokenTable) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    for (token, text) in tokens {
        let bytes = text.as_bytes();
        if bytes.len() > 0xFF {
            return Err(BinaryError::LengthExceeded {
                length: bytes.len(),
            });
        }
        out.push(*token);
        out.push(bytes.len() as u8);
        out.extend_from_slice(bytes);
    }
    Ok(out)
}

/// Post-decode pass over a tree: replace control bytes in every cdata
/// payload using the nearest enclosing token table.
///
/// A control byte with no covering table, or absent from the nearest
/// table, stays literal with a warning; substitution never fails the
/// document.
pub fn substitute(root: &mut Element) {
    let mut scopes: Vec<TokenTable> = Vec::new();
    walk(root, &mut scopes);
}

fn walk(element: &mut Element, scopes: &mut Vec<TokenTable>) {
    let pushed = match element.tokens() {
        Some(tokens) => {
            scopes.push(tokens.clone());
            true
        }
        None => false,
    };
    if let Some(cdata) = element.cdata() {
        let replaced = apply(cdata, scopes);
        if replaced != cdata {
            element.set_cdata(replaced);
        }
    }
    for child in element.children_mut() {
        walk(child, scopes);
    }
    if pushed {
        scopes.pop();
    }
}

/// Substitute control bytes in `text` against the innermost table of
/// `scopes` (the nearest enclosing element that carries one).
pub fn apply(text: &str, scopes: &[TokenTable]) -> String {
    TOKEN_PATTERN
        .replace_all(text, |captures: &regex::Captures<'_>| {
            let literal = &captures[0];
            let token = literal.as_bytes()[0];
            match scopes.last().and_then(|tokens| tokens.get(&token)) {
                Some(replacement) => replacement.clone(),
                None => {
                    tracing::warn!(
                        "no token table entry for control byte 0x{:02x}, leaving it in place",
                        token
                    );
                    literal.to_string()
                }
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_round_trip() {
        let mut tokens = TokenTable::new();
        tokens.insert(0x02, "Radio".to_string());
        tokens.insert(0x03, "FM".to_string());
        let bytes = encode_token_table(&tokens).unwrap();
        assert_eq!(
            bytes,
            vec![0x02, 0x05, b'R', b'a', b'd', b'i', b'o', 0x03, 0x02, b'F', b'M']
        );
        assert_eq!(decode_token_table(&bytes).unwrap(), tokens);
    }

    #[test]
    fn test_truncated_table() {
        let err = decode_token_table(&[0x02, 0x05, b'R']).unwrap_err();
        assert!(matches!(err, BinaryError::TruncatedInput { .. }));
    }

    #[test]
    fn test_apply_nearest_table() {
        let mut outer = TokenTable::new();
        outer.insert(0x02, "Outer".to_string());
        let mut inner = TokenTable::new();
        inner.insert(0x02, "Inner".to_string());
        let scopes = vec![outer, inner];
        assert_eq!(apply("\u{2} One", &scopes), "Inner One");
    }

    #[test]
    fn test_apply_missing_entry_left_literal() {
        let mut tokens = TokenTable::new();
        tokens.insert(0x02, "Radio".to_string());
        let scopes = vec![tokens];
        assert_eq!(apply("\u{2}\u{3}", &scopes), "Radio\u{3}");
        assert_eq!(apply("plain", &scopes), "plain");
        assert_eq!(apply("\u{2}", &[]), "\u{2}");
    }

    #[test]
    fn test_whitespace_controls_exempt() {
        let mut tokens = TokenTable::new();
        tokens.insert(0x09, "TAB".to_string());
        let scopes = vec![tokens];
        // 0x09 is outside the substitution range
        assert_eq!(apply("a\tb", &scopes), "a\tb");
    }
}
