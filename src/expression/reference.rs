//! logos-based validation of qualified references (`member`, `member.field`).
//!
//! A reference is one identifier followed by any number of dot-separated
//! identifiers. Runs of dots are accepted between identifiers, whitespace is
//! not.

use logos::Logos;

/// Token of a qualified reference.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefToken {
    /// Identifier: letters, digits, `_` and `$`, not starting with a digit.
    #[regex(r"[a-zA-Z_$][0-9a-zA-Z_$]*")]
    Ident,

    /// One or more dots.
    #[regex(r"\.+")]
    Dots,
}

/// Whether `name` matches `ident(.+ident)*` exactly.
pub fn is_valid_qualified_name(name: &str) -> bool {
    let mut lexer = RefToken::lexer(name);
    let mut expect_ident = true;
    while let Some(token) = lexer.next() {
        match (token, expect_ident) {
            (Ok(RefToken::Ident), true) => expect_ident = false,
            (Ok(RefToken::Dots), false) => expect_ident = true,
            _ => return false,
        }
    }
    !expect_ident
}
