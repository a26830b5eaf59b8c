//! Command line parsing.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use chrono::Duration;
use kisaviz_core::freshness_minutes;

pub const USAGE: &str = "\
Usage:
  kisaviz contests [--max-age MINUTES]
  kisaviz report <contest-id> [--max-age MINUTES]
  kisaviz export <contest-id> [OUTPUT.json] [--max-age MINUTES]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Contests,
    Report { contest_id: String },
    Export { contest_id: String, output: Option<PathBuf> },
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub command: Command,
    /// Overrides the configured freshness window
    pub max_age: Option<Duration>,
}

impl Args {
    /// Parse arguments, excluding the program name.
    pub fn parse(args: &[String]) -> Result<Self> {
        let mut max_age = None;
        let mut positional = Vec::new();

        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--max-age" => {
                    let value = iter
                        .next()
                        .ok_or_else(|| anyhow!("--max-age needs a value in minutes"))?;
                    let minutes: i64 = value
                        .parse()
                        .with_context(|| format!("Invalid --max-age value: {}", value))?;
                    if minutes < 0 {
                        bail!("--max-age cannot be negative");
                    }
                    max_age = Some(freshness_minutes(minutes)?);
                }
                "-h" | "--help" => {
                    return Ok(Self {
                        command: Command::Help,
                        max_age,
                    })
                }
                other if other.starts_with("--") => bail!("Unknown option: {}", other),
                other => positional.push(other.to_string()),
            }
        }

        let mut positional = positional.into_iter();
        let command = match positional.next().as_deref() {
            None | Some("help") => Command::Help,
            Some("contests") => Command::Contests,
            Some("report") => Command::Report {
                contest_id: Self::contest_id(positional.next())?,
            },
            Some("export") => Command::Export {
                contest_id: Self::contest_id(positional.next())?,
                output: positional.next().map(PathBuf::from),
            },
            Some(other) => bail!("Unknown command: {}", other),
        };

        if let Some(extra) = positional.next() {
            bail!("Unexpected argument: {}", extra);
        }

        Ok(Self { command, max_age })
    }

    fn contest_id(value: Option<String>) -> Result<String> {
        value
            .filter(|id| !id.is_empty())
            .ok_or_else(|| anyhow!("Missing contest id"))
    }
}
