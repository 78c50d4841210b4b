use std::fmt;

use crate::table::{SymbolTable, UNKNOWN_MARKER, WORD_SEPARATOR};

/// Single unit of encoded output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// Code for one character, a string over `.` and `-`.
    Letter(&'static str),
    /// Separator standing in for a space.
    WordSeparator,
    /// Placeholder for a character that has no code.
    Unknown,
}

impl Token {
    pub fn as_str(&self) -> &'static str {
        match *self {
            Token::Letter(code) => code,
            Token::WordSeparator => WORD_SEPARATOR,
            Token::Unknown => UNKNOWN_MARKER,
        }
    }
}

/// Ordered tokens produced by [`encode`]. Serialises with single spaces
/// between tokens, so word separators end up surrounded by spaces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeSequence {
    tokens: Vec<Token>,
}

impl CodeSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Number of characters that could not be encoded.
    pub fn unknown_count(&self) -> usize {
        self.tokens
            .iter()
            .filter(|token| matches!(token, Token::Unknown))
            .count()
    }
}

impl fmt::Display for CodeSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, token) in self.tokens.iter().enumerate() {
            if idx > 0 {
                f.write_str(" ")?;
            }
            f.write_str(token.as_str())?;
        }
        Ok(())
    }
}

impl FromIterator<Token> for CodeSequence {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        Self {
            tokens: iter.into_iter().collect(),
        }
    }
}

/// Encodes `text` using the standard table.
///
/// Whitespace-only input yields an empty sequence. Characters without a code
/// become [`Token::Unknown`]; nothing here can fail.
pub fn encode(text: &str) -> CodeSequence {
    if text.trim().is_empty() {
        return CodeSequence::new();
    }

    let table = SymbolTable::standard();
    text.to_uppercase()
        .chars()
        .map(|ch| match table.lookup(ch) {
            Some(WORD_SEPARATOR) => Token::WordSeparator,
            Some(code) => Token::Letter(code),
            None => Token::Unknown,
        })
        .collect()
}
