//! Line-ending and indentation settings shared by the page and nested content.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Line terminator style used for every emitted line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnd {
    /// `\n`
    #[default]
    Unix,
    /// `\r\n`
    Win,
    /// `\r`
    Mac,
}

impl LineEnd {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnd::Unix => "\n",
            LineEnd::Win => "\r\n",
            LineEnd::Mac => "\r",
        }
    }

    /// The option name (`unix`, `win`, `mac`).
    pub fn name(self) -> &'static str {
        match self {
            LineEnd::Unix => "unix",
            LineEnd::Win => "win",
            LineEnd::Mac => "mac",
        }
    }
}

impl FromStr for LineEnd {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unix" => Ok(LineEnd::Unix),
            "win" => Ok(LineEnd::Win),
            "mac" => Ok(LineEnd::Mac),
            other => Err(Error::ConfigError(format!(
                "unknown line ending \"{}\" (expected unix, win or mac)",
                other
            ))),
        }
    }
}

impl fmt::Display for LineEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Formatting handed to nested renderables so their output lines up with
/// the surrounding document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatting {
    pub line_end: LineEnd,
    /// One indentation unit.
    pub tab: String,
    /// Number of indentation units the content starts at.
    pub offset: usize,
}

impl Default for Formatting {
    fn default() -> Self {
        Self {
            line_end: LineEnd::Unix,
            tab: "\t".to_string(),
            offset: 0,
        }
    }
}

impl Formatting {
    pub fn new(line_end: LineEnd, tab: impl Into<String>) -> Self {
        Self {
            line_end,
            tab: tab.into(),
            offset: 0,
        }
    }

    /// The same settings starting `levels` units deeper.
    pub fn nested(&self, levels: usize) -> Self {
        Self {
            offset: self.offset + levels,
            ..self.clone()
        }
    }

    /// Leading whitespace for the current offset.
    pub fn indent(&self) -> String {
        self.tab.repeat(self.offset)
    }

    pub fn lnend(&self) -> &'static str {
        self.line_end.as_str()
    }
}
