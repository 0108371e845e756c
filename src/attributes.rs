//! HTML attribute lists: parsing `key="value"` strings and rendering them back.
//!
//! Attribute names are case-insensitive and stored lower-cased. Order of first
//! insertion is preserved so rendered output is deterministic.

use std::str::FromStr;

use crate::{Error, Result};

/// Escapes a value for use inside a double-quoted attribute.
pub fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Ordered attribute name/value pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(String, String)>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses an attribute string such as `charset="utf-8" cache=false nowrap`.
    ///
    /// Values may be double-quoted, single-quoted or bare. A name without a
    /// value maps to itself (`nowrap` becomes `nowrap="nowrap"`).
    ///
    /// # Examples
    ///
    /// ```
    /// let attrs = htmlpage::Attributes::parse(r#"Lineend="win" tab='  ' nowrap"#).unwrap();
    /// assert_eq!(attrs.get("lineend"), Some("win"));
    /// assert_eq!(attrs.get("tab"), Some("  "));
    /// assert_eq!(attrs.get("nowrap"), Some("nowrap"));
    /// ```
    pub fn parse(input: &str) -> Result<Self> {
        let mut attrs = Attributes::new();
        let mut chars = input.chars().peekable();

        loop {
            while chars.next_if(|c| c.is_whitespace()).is_some() {}
            let Some(&first) = chars.peek() else {
                break;
            };
            if !(first.is_alphabetic() || first == '_' || first == ':') {
                return Err(Error::ConfigError(format!(
                    "unexpected character '{}' in attribute string \"{}\"",
                    first, input
                )));
            }

            let mut name = String::new();
            while let Some(c) = chars.next_if(|c| is_name_char(*c)) {
                name.push(c);
            }
            if let Some(&c) = chars.peek() {
                if !c.is_whitespace() && c != '=' {
                    return Err(Error::ConfigError(format!(
                        "unexpected character '{}' after attribute \"{}\"",
                        c, name
                    )));
                }
            }

            while chars.next_if(|c| c.is_whitespace()).is_some() {}
            if chars.next_if_eq(&'=').is_none() {
                let value = name.clone();
                attrs.set(&name, value);
                continue;
            }
            while chars.next_if(|c| c.is_whitespace()).is_some() {}

            let mut value = String::new();
            match chars.peek().copied() {
                Some(quote @ ('"' | '\'')) => {
                    chars.next();
                    let mut closed = false;
                    for c in chars.by_ref() {
                        if c == quote {
                            closed = true;
                            break;
                        }
                        value.push(c);
                    }
                    if !closed {
                        return Err(Error::ConfigError(format!(
                            "unterminated value for attribute \"{}\"",
                            name
                        )));
                    }
                }
                _ => {
                    while let Some(c) = chars.next_if(|c| !c.is_whitespace()) {
                        value.push(c);
                    }
                }
            }
            attrs.set(&name, value);
        }

        Ok(attrs)
    }

    /// Returns the value for `name` (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&str> {
        let name = name.to_lowercase();
        self.entries
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Sets an attribute, replacing an existing value in place.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let name = name.to_lowercase();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Removes an attribute, returning its previous value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let name = name.to_lowercase();
        let idx = self.entries.iter().position(|(k, _)| *k == name)?;
        Some(self.entries.remove(idx).1)
    }

    /// Merges `other` into `self`; values in `other` win.
    pub fn update(&mut self, other: &Attributes) {
        for (k, v) in other.iter() {
            self.set(k, v);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Renders the list as `a="1" b="2"`, escaping values. Empty when there
    /// are no attributes.
    pub fn to_attr_string(&self) -> String {
        self.entries
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", k, escape_attr(v)))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | ':' | '.' | '-')
}

impl FromStr for Attributes {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Attributes::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_quoted_bare_and_flag_values() {
        let attrs =
            Attributes::parse(r#" charset="iso-8859-1"  cache=true doctype='HTML 4.01 Strict' nowrap "#)
                .unwrap();
        assert_eq!(attrs.len(), 4);
        assert_eq!(attrs.get("charset"), Some("iso-8859-1"));
        assert_eq!(attrs.get("cache"), Some("true"));
        assert_eq!(attrs.get("doctype"), Some("HTML 4.01 Strict"));
        assert_eq!(attrs.get("nowrap"), Some("nowrap"));
    }

    #[test]
    fn allows_whitespace_around_equals() {
        let attrs = Attributes::parse("width = 100%  align =center").unwrap();
        assert_eq!(attrs.get("width"), Some("100%"));
        assert_eq!(attrs.get("align"), Some("center"));
    }

    #[test]
    fn names_are_case_insensitive_and_overwrite() {
        let attrs = Attributes::parse(r#"Class="a" CLASS="b""#).unwrap();
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs.get("class"), Some("b"));
    }

    #[test]
    fn rejects_unterminated_quote() {
        let err = Attributes::parse(r#"title="oops"#).unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn rejects_garbage_names() {
        assert!(Attributes::parse(r#""quoted"=1"#).is_err());
        assert!(Attributes::parse("a\"b=1").is_err());
    }

    #[test]
    fn empty_input_is_empty_list() {
        let attrs = Attributes::parse("   ").unwrap();
        assert!(attrs.is_empty());
        assert_eq!(attrs.to_attr_string(), "");
    }

    #[test]
    fn renders_in_insertion_order_with_escaping() {
        let mut attrs = Attributes::new();
        attrs.set("onload", "init(\"x\")");
        attrs.set("class", "a&b");
        attrs.set("onload", "start()");
        assert_eq!(attrs.to_attr_string(), r#"onload="start()" class="a&amp;b""#);
    }

    #[test]
    fn remove_and_update() {
        let mut attrs: Attributes = r#"id="main" class="x""#.parse().unwrap();
        let other = Attributes::parse(r#"class="y" lang="de""#).unwrap();
        attrs.update(&other);
        assert_eq!(attrs.to_attr_string(), r#"id="main" class="y" lang="de""#);
        assert_eq!(attrs.remove("ID"), Some("main".to_string()));
        assert_eq!(attrs.remove("id"), None);
    }
}
