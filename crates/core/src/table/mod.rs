//! Static character ↔ code mapping.
//!
//! The table is built once per process and never mutated afterwards. The
//! reverse direction is derived from the forward entries at the same time so
//! the two can never drift apart.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Token standing in for a space between words.
pub const WORD_SEPARATOR: &str = "/";

/// Marker substituted for anything without a mapping.
pub const UNKNOWN_MARKER: &str = "?";

const STANDARD_ENTRIES: &[(char, &str)] = &[
    ('A', ".-"),
    ('B', "-..."),
    ('C', "-.-."),
    ('D', "-.."),
    ('E', "."),
    ('F', "..-."),
    ('G', "--."),
    ('H', "...."),
    ('I', ".."),
    ('J', ".---"),
    ('K', "-.-"),
    ('L', ".-.."),
    ('M', "--"),
    ('N', "-."),
    ('O', "---"),
    ('P', ".--."),
    ('Q', "--.-"),
    ('R', ".-."),
    ('S', "..."),
    ('T', "-"),
    ('U', "..-"),
    ('V', "...-"),
    ('W', ".--"),
    ('X', "-..-"),
    ('Y', "-.--"),
    ('Z', "--.."),
    ('0', "-----"),
    ('1', ".----"),
    ('2', "..---"),
    ('3', "...--"),
    ('4', "....-"),
    ('5', "....."),
    ('6', "-...."),
    ('7', "--..."),
    ('8', "---.."),
    ('9', "----."),
    ('.', ".-.-.-"),
    (',', "--..--"),
    ('?', "..--.."),
    ('\'', ".----."),
    ('!', "-.-.--"),
    ('/', "-..-."),
    ('(', "-.--."),
    (')', "-.--.-"),
    ('&', ".-..."),
    (':', "---..."),
    (';', "-.-.-."),
    ('=', "-...-"),
    ('+', ".-.-."),
    ('-', "-....-"),
    ('_', "..--.-"),
    ('"', ".-..-."),
    ('$', "...-..-"),
    ('@', ".--.-."),
    (' ', WORD_SEPARATOR),
];

/// Immutable bidirectional mapping between characters and code strings.
#[derive(Debug)]
pub struct SymbolTable {
    entries: &'static [(char, &'static str)],
    forward: HashMap<char, &'static str>,
    reverse: HashMap<&'static str, char>,
}

impl SymbolTable {
    /// Returns the process-wide standard table.
    pub fn standard() -> &'static SymbolTable {
        static TABLE: OnceLock<SymbolTable> = OnceLock::new();
        TABLE.get_or_init(|| SymbolTable::build(STANDARD_ENTRIES))
    }

    fn build(entries: &'static [(char, &'static str)]) -> Self {
        let forward = entries.iter().copied().collect();
        let reverse = entries.iter().map(|&(ch, code)| (code, ch)).collect();
        Self {
            entries,
            forward,
            reverse,
        }
    }

    /// Looks up the code for `ch`, ignoring case.
    pub fn lookup(&self, ch: char) -> Option<&'static str> {
        let mut upper = ch.to_uppercase();
        match (upper.next(), upper.next()) {
            (Some(single), None) => self.forward.get(&single).copied(),
            _ => None,
        }
    }

    /// Looks up the character encoded by `code`.
    pub fn reverse_lookup(&self, code: &str) -> Option<char> {
        self.reverse.get(code).copied()
    }

    /// All entries in table order, including the word separator.
    pub fn entries(&self) -> impl Iterator<Item = (char, &'static str)> + '_ {
        self.entries.iter().copied()
    }

    /// Entries suitable for a printed reference chart; the space entry is
    /// left out.
    pub fn reference_entries(&self) -> impl Iterator<Item = (char, &'static str)> + '_ {
        self.entries().filter(|&(ch, _)| ch != ' ')
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
