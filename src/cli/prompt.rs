use crate::error::{Result, WeatherError};
use std::fmt::Display;
use std::io::{self, BufRead, Stdin, StdinLock, Stdout, Write};
use tracing::{error, warn};

/// Line-oriented prompt over any reader/writer pair.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl Prompter<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        let stdin: Stdin = io::stdin();
        Self::new(stdin.lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub fn say(&mut self, text: impl Display) -> Result<()> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }

    /// Print `prompt` and read one trimmed line. End of input is
    /// [`WeatherError::Cancelled`].
    pub fn read_line(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(WeatherError::Cancelled);
        }
        Ok(line.trim().to_string())
    }

    /// Prompt until the input parses and passes `validator`.
    ///
    /// Parse failures are logged as errors and validation failures as
    /// warnings; both print `error_msg` and ask again.
    pub fn ask_until_valid<T, E, P, V>(
        &mut self,
        prompt: &str,
        parser: P,
        validator: V,
        error_msg: &str,
    ) -> Result<T>
    where
        E: Display,
        P: Fn(&str) -> std::result::Result<T, E>,
        V: Fn(&T) -> bool,
    {
        loop {
            let raw = self.read_line(prompt)?;
            let value = match parser(&raw) {
                Ok(value) => value,
                Err(e) => {
                    error!(input = %raw, "{}: {}", error_msg, e);
                    self.say(error_msg)?;
                    continue;
                }
            };
            if !validator(&value) {
                warn!(input = %raw, "{}", error_msg);
                self.say(error_msg)?;
                continue;
            }
            return Ok(value);
        }
    }

    pub fn ask_parsed<T, E, P>(&mut self, prompt: &str, parser: P, error_msg: &str) -> Result<T>
    where
        E: Display,
        P: Fn(&str) -> std::result::Result<T, E>,
    {
        self.ask_until_valid(prompt, parser, |_| true, error_msg)
    }
}
