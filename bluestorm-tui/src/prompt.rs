//! Line-input prompts used while the menu blocks for text input

use std::io::{self, Write};
use std::str::FromStr;

use bluestorm_core::{Error, Result};

/// Line-input seam.
///
/// The real implementation reads stdin in its normal line-buffered mode;
/// tests script the answers.
pub trait Prompt {
    fn line(&mut self, prompt: &str) -> io::Result<String>;
}

/// Stdin-backed prompt
#[derive(Debug, Default)]
pub struct StdinPrompt;

impl Prompt for StdinPrompt {
    fn line(&mut self, prompt: &str) -> io::Result<String> {
        let mut stdout = io::stdout();
        write!(stdout, "{prompt}")?;
        stdout.flush()?;

        let mut line = String::new();
        io::stdin().read_line(&mut line)?;
        Ok(line.trim().to_string())
    }
}

/// Ask for a value, taking `default` on empty input.
///
/// Non-empty input that does not parse is an error, not a silent
/// default; launching an attack the user did not describe is worse than
/// asking again.
pub fn read_or_default<T, P>(prompt: &mut P, field: &'static str, text: &str, default: T) -> Result<T>
where
    T: FromStr,
    P: Prompt + ?Sized,
{
    let line = prompt.line(text)?;
    if line.is_empty() {
        return Ok(default);
    }
    line.parse()
        .map_err(|_| Error::invalid_input(field, line.as_str()))
}

/// Ask a y/N question; only `y`/`Y` confirms
pub fn confirm<P: Prompt + ?Sized>(prompt: &mut P, text: &str) -> Result<bool> {
    let line = prompt.line(text)?;
    Ok(matches!(line.as_str(), "y" | "Y"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    struct Scripted(VecDeque<&'static str>);

    impl Prompt for Scripted {
        fn line(&mut self, _prompt: &str) -> io::Result<String> {
            Ok(self.0.pop_front().unwrap_or_default().to_string())
        }
    }

    #[test]
    fn empty_input_takes_the_default() {
        let mut prompt = Scripted(VecDeque::from([""]));
        let value: u32 = read_or_default(&mut prompt, "packet size", "size: ", 600).unwrap();
        assert_eq!(value, 600);
    }

    #[test]
    fn explicit_input_overrides_the_default() {
        let mut prompt = Scripted(VecDeque::from(["1200"]));
        let value: u32 = read_or_default(&mut prompt, "packet size", "size: ", 600).unwrap();
        assert_eq!(value, 1200);
    }

    #[test]
    fn unparsable_input_is_an_error() {
        let mut prompt = Scripted(VecDeque::from(["lots"]));
        let err = read_or_default::<u32, _>(&mut prompt, "packet size", "size: ", 600).unwrap_err();
        assert!(matches!(err, Error::InvalidInput { .. }));
    }

    #[test]
    fn only_y_confirms() {
        for (answer, expected) in [("y", true), ("Y", true), ("n", false), ("", false), ("yes", false)] {
            let mut prompt = Scripted(VecDeque::from([answer]));
            assert_eq!(confirm(&mut prompt, "stop? ").unwrap(), expected, "answer {answer:?}");
        }
    }
}
