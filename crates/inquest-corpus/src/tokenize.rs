// SPDX-FileCopyrightText: 2026 Inquest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Case- and stem-insensitive tokenization shared by indexing and querying.

/// Splits text into lowercase, lightly stemmed terms.
///
/// Runs of letters and digits form tokens, so CJK text without spaces stays
/// one token per run.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|piece| !piece.is_empty())
        .map(|piece| stem(&piece.to_lowercase()))
        .collect()
}

/// Strips common English inflections from an ASCII token.
///
/// Handles plural `-s`/`-ies`/`-sses` plus `-ing` and `-ed`. Non-ASCII
/// tokens and tokens of four characters or fewer pass through unchanged.
pub fn stem(token: &str) -> String {
    if token.len() <= 4 || !token.is_ascii() {
        return token.to_string();
    }
    if let Some(base) = token.strip_suffix("ies") {
        return format!("{base}y");
    }
    if let Some(base) = token.strip_suffix("sses") {
        return format!("{base}ss");
    }
    if let Some(base) = token.strip_suffix("ing")
        && base.len() >= 4
    {
        return base.to_string();
    }
    if let Some(base) = token.strip_suffix("ed")
        && base.len() >= 4
    {
        return base.to_string();
    }
    if token.ends_with('s') && !token.ends_with("ss") && !token.ends_with("us") && !token.ends_with("is")
    {
        return token[..token.len() - 1].to_string();
    }
    token.to_string()
}
