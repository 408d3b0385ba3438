//! Generator configuration helpers: indentation unit and extension lists.

use std::path::Path;

use anyhow::Result;
use clap::ValueEnum;
use glob::Pattern;

use crate::errors::Error;
use crate::io;

/// Indentation unit for generated code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Indent {
    /// One tab per level
    Tab,
    /// Two spaces per level
    #[value(name = "2")]
    Two,
    /// Four spaces per level
    #[default]
    #[value(name = "4")]
    Four,
    /// Eight spaces per level
    #[value(name = "8")]
    Eight,
}

impl Indent {
    pub fn unit(self) -> &'static str {
        match self {
            Indent::Tab => "\t",
            Indent::Two => "  ",
            Indent::Four => "    ",
            Indent::Eight => "        ",
        }
    }
}

/// Read an extension list file: one glob pattern per line, `#` comments and
/// blank lines ignored.
pub fn read_extension_patterns(path: &Path) -> Result<Vec<Pattern>> {
    let text = io::read_file(path)?;
    Ok(parse_extension_patterns(&text)?)
}

pub fn parse_extension_patterns(text: &str) -> Result<Vec<Pattern>, Error> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| {
            Pattern::new(line).map_err(|e| Error::InvalidPattern {
                pattern: line.to_string(),
                message: e.to_string(),
            })
        })
        .collect()
}
