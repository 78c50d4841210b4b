use crate::table::{SymbolTable, WORD_SEPARATOR};

const UNKNOWN_CHAR: char = '?';

/// Decodes a code string back into uppercase text.
///
/// Groups between `/` separators become words joined by one space. An empty
/// group still takes part in the join, so `a / / b` decodes with a double
/// space. Tokens not present in the table decode to `?`.
pub fn decode(code: &str) -> String {
    if code.trim().is_empty() {
        return String::new();
    }
    decode_words(code).join(" ")
}

/// Decodes each `/`-separated group into its own word.
pub fn decode_words(code: &str) -> Vec<String> {
    if code.trim().is_empty() {
        return Vec::new();
    }

    let table = SymbolTable::standard();
    code.split(WORD_SEPARATOR)
        .map(|group| decode_group(table, group))
        .collect()
}

fn decode_group(table: &SymbolTable, group: &str) -> String {
    group
        .split_whitespace()
        .map(|token| table.reverse_lookup(token).unwrap_or(UNKNOWN_CHAR))
        .collect()
}
