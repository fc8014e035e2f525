//! Splits a raw command line into whitespace-separated arguments.

/// Characters that separate arguments: space, horizontal tab, carriage
/// return, newline and the alert (BEL) control character. Nothing else
/// splits; there is no quoting or escaping, so a delimiter can never
/// appear inside an argument.
const DELIMITERS: &[char] = &[' ', '\t', '\r', '\n', '\u{7}'];

/// Splits `line` into its arguments.
///
/// Runs of adjacent delimiters count as a single separator, so an empty or
/// all-delimiter line yields an empty vector. The returned slices borrow
/// from `line` and live only as long as it does.
pub fn split_into_args(line: &str) -> Vec<&str> {
    line.split(DELIMITERS)
        .filter(|arg| !arg.is_empty())
        .collect()
}
