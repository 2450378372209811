//! Constants for Newick parsing.

/// Newick label delimiters: parentheses, comma, colon, semicolon, comment start
/// (whitespace ends unquoted labels as well)
pub(crate) const NEWICK_LABEL_DELIMITERS: &[u8] = b"(),:;[";

/// Default guess for number of leaves, when unknown
pub(crate) const DEFAULT_NUM_LEAVES_GUESS: usize = 10;
