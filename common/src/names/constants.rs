// Ledger Name Rules Constants

/// Default maximum name length, counted in characters
pub const DEFAULT_MAX_NAME_LENGTH: usize = 128;

/// Default longest allowed run of one repeated character
pub const DEFAULT_MAX_REPEATED_RUN: usize = 16;

/// Punctuation accepted in names on top of alphanumerics
pub const DEFAULT_EXTRA_PUNCTUATION: &str = "_-.";
