use std::io::{self, BufRead, Write};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SelectError {
    #[error("there are no shows to choose from")]
    NoOptions,
    #[error("no show was chosen")]
    NoChoice,
    #[error("could not prompt for a show: {0}")]
    Io(#[from] io::Error),
}

/// Picks exactly one entry out of a list of options
pub trait Selector {
    fn select(&mut self, prompt: &str, options: &[String]) -> Result<String, SelectError>;
}

/// Numbered list on the terminal. Takes either the number or the name; keeps
/// asking until it gets one of them or the input ends.
pub struct TerminalSelector<R, W> {
    input: R,
    output: W,
}

impl TerminalSelector<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalSelector<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn choice<'a>(answer: &str, options: &'a [String]) -> Option<&'a String> {
        match answer.parse::<usize>() {
            Ok(number) if number >= 1 => options.get(number - 1),
            Ok(_) => None,
            Err(_) => options.iter().find(|option| option.as_str() == answer),
        }
    }
}

impl<R: BufRead, W: Write> Selector for TerminalSelector<R, W> {
    fn select(&mut self, prompt: &str, options: &[String]) -> Result<String, SelectError> {
        if options.is_empty() {
            return Err(SelectError::NoOptions);
        }

        for (i, option) in options.iter().enumerate() {
            writeln!(self.output, "{:>3}) {}", i + 1, option)?;
        }

        loop {
            write!(self.output, "{prompt} ")?;
            self.output.flush()?;

            let mut answer = String::new();
            if self.input.read_line(&mut answer)? == 0 {
                return Err(SelectError::NoChoice);
            }

            match Self::choice(answer.trim(), options) {
                Some(option) => return Ok(option.clone()),
                None => writeln!(self.output, "Pick a number from 1 to {}", options.len())?,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Vec<String> {
        vec!["chase.json".to_string(), "flash.json".to_string()]
    }

    #[test]
    fn test_select_by_number() {
        let mut output = Vec::new();
        let mut selector = TerminalSelector::new("2\n".as_bytes(), &mut output);

        assert_eq!(selector.select("Which show?", &options()).unwrap(), "flash.json");

        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("  1) chase.json"));
        assert!(output.contains("  2) flash.json"));
    }

    #[test]
    fn test_select_by_name_after_bad_answer() {
        let mut output = Vec::new();
        let mut selector = TerminalSelector::new("0\nwhat\nchase.json\n".as_bytes(), &mut output);

        assert_eq!(selector.select("Which show?", &options()).unwrap(), "chase.json");
        assert_eq!(
            String::from_utf8(output).unwrap().matches("Pick a number").count(),
            2
        );
    }

    #[test]
    fn test_input_ends() {
        let mut selector = TerminalSelector::new("7\n".as_bytes(), Vec::new());

        assert!(matches!(
            selector.select("Which show?", &options()),
            Err(SelectError::NoChoice)
        ));
    }

    #[test]
    fn test_nothing_to_choose() {
        let mut selector = TerminalSelector::new("1\n".as_bytes(), Vec::new());

        assert!(matches!(
            selector.select("Which show?", &[]),
            Err(SelectError::NoOptions)
        ));
    }
}
