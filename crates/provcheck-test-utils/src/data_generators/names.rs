//! Random names for objects created by tests.

use rand::distributions::Alphanumeric;
use rand::Rng;

/// Default length of generated names
pub const DEFAULT_NAME_LENGTH: usize = 10;

/// A random ASCII alphanumeric string of `len` characters
pub fn gen_alphanumeric(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// A random name of `len` characters starting with `start`.
///
/// The prefix counts towards the length; when it is longer than `len` the
/// prefix alone is returned.
pub fn gen_alphanumeric_with_prefix(len: usize, start: &str) -> String {
    let suffix_len = len.saturating_sub(start.chars().count());
    format!("{}{}", start, gen_alphanumeric(suffix_len))
}

/// A random name of the default length
pub fn gen_name() -> String {
    gen_alphanumeric(DEFAULT_NAME_LENGTH)
}
