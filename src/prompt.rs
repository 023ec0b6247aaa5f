use std::io::{self, Write};

use colored::Colorize;

use crate::error::Result;

/// Yes/no gate in front of mutating requests. Abstracted so tests can
/// answer deterministically instead of reading a terminal.
pub trait Confirm {
    fn confirm(&self, message: &str) -> Result<bool>;
}

pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, message: &str) -> Result<bool> {
        print!("{}", message.blue());
        io::stdout().flush().ok();
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        Ok(is_yes(&input))
    }
}

/// Only a literal "yes" (any case) proceeds; everything else declines.
/// Only the line terminator is stripped before the comparison.
pub fn is_yes(input: &str) -> bool {
    input
        .trim_end_matches(['\r', '\n'])
        .eq_ignore_ascii_case("yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_yes_confirms() {
        assert!(is_yes("yes"));
        assert!(is_yes("YES"));
        assert!(is_yes("Yes\n"));
        assert!(is_yes("yes\r\n"));
        assert!(!is_yes("y"));
        assert!(!is_yes("no"));
        assert!(!is_yes(""));
        assert!(!is_yes("yes please"));
        assert!(!is_yes(" yes "));
    }
}
