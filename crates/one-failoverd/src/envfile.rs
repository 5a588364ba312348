//! Context environment overlay
//!
//! The contextualization packages write the live context variables to
//! `/run/one-context/one_env` as `export KEY="VALUE"` lines. The `up` pass
//! re-reads this file so enable flags changed by a reconfiguration become
//! visible without restarting the worker.

use std::{collections::HashMap, fs, io::Result as IoResult, path::Path};

/// Variables re-read from the live context environment file
#[derive(Debug, Default, Clone)]
pub struct EnvOverlay {
    vars: HashMap<String, String>,
}

impl EnvOverlay {
    pub fn load(file_path: &Path) -> IoResult<Self> {
        Ok(Self::parse(&fs::read_to_string(file_path)?))
    }

    /// Parse `export KEY="VALUE"` lines
    ///
    /// The `export ` prefix is optional and one pair of surrounding single
    /// or double quotes is stripped. Lines without a `=` and comments are
    /// skipped. Values spanning multiple lines (literal newlines in context
    /// variables) are not folded; none of the flags read here use them.
    #[must_use]
    pub fn parse(contents: &str) -> Self {
        let vars = contents
            .lines()
            .filter_map(|line| {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    return None;
                }
                let line = line.strip_prefix("export ").unwrap_or(line);
                let (name, value) = line.split_once('=')?;
                Some((name.trim().to_owned(), unquote(value.trim()).to_owned()))
            })
            .collect();
        Self { vars }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|value| value.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}
