use std::io::{self, BufRead, StdinLock, Stdout, Write};

use super::error::RatingResult;
use super::rater::{Rater, RatingPrompt, Verdict};

/// Line-based prompt: `y` confirms, `n` denies, `s` defers. End of input defers.
pub struct TerminalRater<R, W> {
    input: R,
    output: W,
}

impl TerminalRater<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalRater<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn show(&mut self, prompt: &RatingPrompt) -> io::Result<()> {
        let pair = &prompt.pair;
        writeln!(self.output)?;
        writeln!(
            self.output,
            "[{}/{}] score {:.2} (ask >= {}, accept >= {})",
            prompt.position,
            prompt.total,
            pair.score,
            prompt.thresholds.ask(),
            prompt.thresholds.accept()
        )?;
        for (label, id, details) in [
            ("A", &pair.origin, &prompt.origin),
            ("B", &pair.candidate, &prompt.candidate),
        ] {
            writeln!(self.output, "--- {} {}", label, id)?;
            match details {
                Some(details) => {
                    writeln!(self.output, "{}", details.subject)?;
                    if let Some(author) = &details.author {
                        writeln!(self.output, "Author: {}", author)?;
                    }
                    if !details.body.is_empty() {
                        writeln!(self.output, "{}", details.body)?;
                    }
                }
                None => writeln!(self.output, "(no details)")?,
            }
        }
        Ok(())
    }
}

impl<R: BufRead, W: Write> Rater for TerminalRater<R, W> {
    fn rate(&mut self, prompt: &RatingPrompt) -> RatingResult<Verdict> {
        self.show(prompt)?;

        let mut line = String::new();
        loop {
            write!(self.output, "Same patch? [y]es / [n]o / [s]kip: ")?;
            self.output.flush()?;

            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                return Ok(Verdict::Defer);
            }

            match line.trim().to_ascii_lowercase().as_str() {
                "y" | "yes" => return Ok(Verdict::Confirm),
                "n" | "no" => return Ok(Verdict::Deny),
                "s" | "skip" => return Ok(Verdict::Defer),
                _ => writeln!(self.output, "Please answer y, n or s.")?,
            }
        }
    }
}
