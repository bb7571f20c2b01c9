//! Alias table and the pre-dispatch substitution pass.

use std::collections::BTreeMap;

use crate::lexer::split_line;

/// Session-scoped alias definitions, keyed by command name.
///
/// Keys are unique; defining an existing name overwrites it. Entries live
/// for the process session only.
#[derive(Debug, Default)]
pub struct AliasTable {
    entries: BTreeMap<String, String>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define or overwrite an alias.
    pub fn define(&mut self, name: &str, replacement: &str) {
        self.entries
            .insert(name.to_string(), replacement.to_string());
    }

    /// Remove an alias. Returns whether it existed.
    pub fn remove(&mut self, name: &str) -> bool {
        self.entries.remove(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Apply the alias pass to a raw line, returning the line to dispatch.
///
/// This is a single, non-recursive, text-level rewrite: the first token is
/// looked up once, and a replacement whose text names another alias is
/// dispatched literally. A line whose first token has no alias is returned
/// unchanged.
pub fn substitute(line: &str, aliases: &AliasTable) -> String {
    let tokens = split_line(line);
    let Some(first) = tokens.first() else {
        return line.to_string();
    };
    let Some(replacement) = aliases.get(first) else {
        return line.to_string();
    };

    // Everything strictly after the first whitespace run that follows the
    // first token; empty for a one-token line.
    let rest = if tokens.len() > 1 {
        let after = line.trim_start();
        match after.find(char::is_whitespace) {
            Some(idx) => after[idx..].trim_start(),
            None => "",
        }
    } else {
        ""
    };

    if rest.is_empty() {
        replacement.to_string()
    } else {
        format!("{} {}", replacement, rest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> AliasTable {
        let mut aliases = AliasTable::new();
        aliases.define("ll", "ls -l");
        aliases
    }

    #[test]
    fn expands_first_token_and_keeps_arguments() {
        assert_eq!(substitute("ll /tmp", &table()), "ls -l /tmp");
    }

    #[test]
    fn expands_bare_alias() {
        assert_eq!(substitute("ll", &table()), "ls -l");
    }

    #[test]
    fn unknown_first_token_passes_through() {
        assert_eq!(substitute("ls -l /tmp", &table()), "ls -l /tmp");
    }

    #[test]
    fn empty_line_passes_through() {
        assert_eq!(substitute("   ", &table()), "   ");
    }

    #[test]
    fn substitution_is_not_recursive() {
        let mut aliases = table();
        aliases.define("l", "ll");
        // "l" expands to "ll" once; "ll" is not expanded again.
        assert_eq!(substitute("l /tmp", &aliases), "ll /tmp");
    }

    #[test]
    fn redefining_overwrites() {
        let mut aliases = table();
        aliases.define("ll", "ls -la");
        assert_eq!(aliases.get("ll"), Some("ls -la"));
    }

    #[test]
    fn extra_whitespace_before_arguments_is_collapsed() {
        assert_eq!(substitute("ll    /tmp", &table()), "ls -l /tmp");
    }
}
