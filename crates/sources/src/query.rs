//! GitHub search query builder.
//!
//! Queries are space-joined tokens, each either a bare term or a
//! `key:value` qualifier. Terms and values containing whitespace are
//! double-quoted.

use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    tokens: Vec<String>,
}

fn quote(value: &str) -> String {
    let value = value.trim().replace('"', "");
    if value.chars().any(char::is_whitespace) {
        format!("\"{}\"", value)
    } else {
        value
    }
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bare search term. Blank terms are ignored.
    pub fn term(mut self, term: &str) -> Self {
        if !term.trim().is_empty() {
            self.tokens.push(quote(term));
        }
        self
    }

    /// `key:value` qualifier.
    pub fn qualifier(mut self, key: &str, value: impl fmt::Display) -> Self {
        self.tokens.push(format!("{}:{}", key, quote(&value.to_string())));
        self
    }

    /// Optional qualifier, skipped when `value` is `None` or blank.
    pub fn qualifier_opt(self, key: &str, value: Option<&str>) -> Self {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(v) => self.qualifier(key, v),
            None => self,
        }
    }

    pub fn build(&self) -> String {
        self.tokens.join(" ")
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.build())
    }
}
