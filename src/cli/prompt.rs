//! Line-based prompts over any reader/writer pair.

use anyhow::{Context, Result};
use std::io::{BufRead, Write};

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Write one line of output.
    pub fn say(&mut self, line: impl AsRef<str>) -> Result<()> {
        writeln!(self.output, "{}", line.as_ref())?;
        Ok(())
    }

    /// Ask a question and return the trimmed answer.
    pub fn ask(&mut self, question: &str) -> Result<String> {
        write!(self.output, "{} ", question)?;
        self.output.flush()?;

        let mut answer = String::new();
        let read = self
            .input
            .read_line(&mut answer)
            .context("Failed to read input")?;
        if read == 0 {
            anyhow::bail!("Input closed");
        }
        Ok(answer.trim().to_string())
    }

    pub fn ask_default(&mut self, question: &str, default: &str) -> Result<String> {
        let answer = self.ask(&format!("{} [{}]:", question, default))?;
        if answer.is_empty() {
            Ok(default.to_string())
        } else {
            Ok(answer)
        }
    }

    /// Numbered menu; returns the 0-based index of the chosen entry.
    pub fn select(&mut self, title: &str, choices: &[String]) -> Result<usize> {
        if choices.is_empty() {
            anyhow::bail!("Nothing to choose from");
        }

        self.say(title)?;
        for (idx, choice) in choices.iter().enumerate() {
            self.say(format!("  {}) {}", idx + 1, choice))?;
        }

        loop {
            let answer = self.ask(">")?;
            match answer.parse::<usize>() {
                Ok(n) if (1..=choices.len()).contains(&n) => return Ok(n - 1),
                _ => self.say(format!("Please enter a number from 1 to {}", choices.len()))?,
            }
        }
    }

    pub fn confirm(&mut self, question: &str, default: bool) -> Result<bool> {
        let hint = if default { "[Y/n]:" } else { "[y/N]:" };
        let answer = self.ask(&format!("{} {}", question, hint))?.to_lowercase();
        Ok(match answer.as_str() {
            "" => default,
            "y" | "yes" => true,
            _ => false,
        })
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_select_retries_until_valid() {
        let mut p = prompter("0\nabc\n2\n");
        let choices = vec!["File".to_string(), "URL".to_string()];
        assert_eq!(p.select("Load from:", &choices).unwrap(), 1);

        let out = String::from_utf8(p.into_output()).unwrap();
        assert!(out.contains("  1) File"));
        assert!(out.contains("Please enter a number from 1 to 2"));
    }

    #[test]
    fn test_confirm_and_default() {
        let mut p = prompter("\ny\nno\n\n");
        assert!(p.confirm("Continue?", true).unwrap());
        assert!(p.confirm("Continue?", false).unwrap());
        assert!(!p.confirm("Continue?", true).unwrap());
        assert_eq!(p.ask_default("Output file", "output.json").unwrap(), "output.json");
    }

    #[test]
    fn test_closed_input() {
        let mut p = prompter("");
        assert!(p.ask("Name?").is_err());
    }
}
