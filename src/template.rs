//! Marker-based splicing of generated fragments into template documents.

use crate::errors::{Error, Result};

const ATTRIBUTION: &str = "
 * This file was generated with cl3w-gen, part of cl3w
 * (hosted at https://github.com/cloudhan/cl3w)
";

const WTFPL: &str = "
 * This program is free software. It comes without any warranty, to the extent
 * permitted by applicable law. You can redistribute it and/or modify it under
 * the terms of the Do What The Fuck You Want To Public License, Version 2, as
 * published by Sam Hocevar. See http://www.wtfpl.net/ for more details.
";

/// What to prepend to a rendered document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    AttributionAndLicense,
    AttributionOnly,
    None,
}

impl Notice {
    pub fn from_flags(no_header: bool, no_license: bool) -> Self {
        if no_header {
            Notice::None
        } else if no_license {
            Notice::AttributionOnly
        } else {
            Notice::AttributionAndLicense
        }
    }
}

/// A template document with `/* generated <key> */` insertion markers.
#[derive(Debug, Clone)]
pub struct Template {
    text: String,
}

impl Template {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Replace the single marker line for `key` with `fragment`.
    ///
    /// A marker that is absent or occurs more than once is a fatal error, so
    /// a half-spliced document can never be written out.
    pub fn bind(&mut self, key: &str, fragment: &str) -> Result<()> {
        let marker = format!("/* generated {key} */\n");
        match self.text.matches(marker.as_str()).count() {
            0 => Err(Error::MarkerMissing {
                key: key.to_string(),
            }),
            1 => {
                self.text = self.text.replacen(marker.as_str(), fragment, 1);
                Ok(())
            }
            count => Err(Error::MarkerDuplicated {
                key: key.to_string(),
                count,
            }),
        }
    }

    pub fn render(&self, notice: Notice) -> String {
        match notice {
            Notice::AttributionAndLicense => {
                format!("/*{ATTRIBUTION} *{WTFPL} */\n{}", self.text)
            }
            Notice::AttributionOnly => format!("/*{ATTRIBUTION} */\n{}", self.text),
            Notice::None => self.text.clone(),
        }
    }
}
