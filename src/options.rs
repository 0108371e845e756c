//! Page construction options.
//!
//! Options come either from a structured source (JSON, or built in code) or
//! from an HTML-style attribute string:
//!
//! ```
//! let opts = htmlpage::PageOptions::from_attr_str(
//!     r#"charset="iso-8859-1" lineend="win" doctype="HTML 4.01 Strict" cache="true""#,
//! )
//! .unwrap();
//! assert_eq!(opts.charset.as_deref(), Some("iso-8859-1"));
//! assert_eq!(opts.cache, Some(true));
//! ```

use serde::{Deserialize, Deserializer, Serialize};

use crate::attributes::Attributes;
use crate::format::LineEnd;
use crate::{Error, Result};

/// Recognized construction options; unset fields keep the page defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageOptions {
    /// Character encoding (default `utf-8`)
    pub charset: Option<String>,
    /// Line ending style (default `unix`)
    #[serde(deserialize_with = "deserialize_line_end")]
    pub lineend: Option<LineEnd>,
    /// Indentation unit (default `\t`)
    pub tab: Option<String>,
    /// Doctype string such as `XHTML 1.0 Strict`, or `none` for simple mode
    pub doctype: Option<String>,
    /// Document language (default `en`)
    pub language: Option<String>,
    /// Whether browsers may cache the page (default `false`)
    #[serde(deserialize_with = "deserialize_flag")]
    pub cache: Option<bool>,
}

impl PageOptions {
    /// Reads options from an attribute string. Unknown keys are ignored.
    pub fn from_attr_str(input: &str) -> Result<Self> {
        let attrs = Attributes::parse(input)?;
        let mut opts = PageOptions::default();
        for (key, value) in attrs.iter() {
            match key {
                "charset" => opts.charset = Some(value.to_string()),
                "lineend" => opts.lineend = Some(value.parse()?),
                "tab" => opts.tab = Some(value.to_string()),
                "doctype" => opts.doctype = Some(value.to_string()),
                "language" => opts.language = Some(value.to_string()),
                "cache" => opts.cache = Some(parse_flag(value)?),
                _ => {}
            }
        }
        Ok(opts)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let opts: PageOptions = serde_json::from_str(json)?;
        Ok(opts)
    }

    /// Overlays every option set in `other` onto `self`.
    pub fn merge(&mut self, other: PageOptions) {
        self.charset = other.charset.or(self.charset.take());
        self.lineend = other.lineend.or(self.lineend);
        self.tab = other.tab.or(self.tab.take());
        self.doctype = other.doctype.or(self.doctype.take());
        self.language = other.language.or(self.language.take());
        self.cache = other.cache.or(self.cache);
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(Error::ConfigError(format!(
            "expected true or false, got \"{}\"",
            other
        ))),
    }
}

/// Accepts `true`/`false` either as JSON booleans or strings.
fn deserialize_flag<'de, D>(deserializer: D) -> std::result::Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    match Option::<Flag>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Flag::Bool(b)) => Ok(Some(b)),
        Some(Flag::Text(s)) => parse_flag(&s)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Accepts line ending names in any case, like the attribute-string path.
fn deserialize_line_end<'de, D>(deserializer: D) -> std::result::Result<Option<LineEnd>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|name| name.parse::<LineEnd>())
        .transpose()
        .map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attr_string_sets_known_keys() {
        let opts = PageOptions::from_attr_str(
            r#"charset="utf-8" lineend="mac" tab="  " doctype="none" language="DE" cache="false" width="3""#,
        )
        .unwrap();
        assert_eq!(
            opts,
            PageOptions {
                charset: Some("utf-8".into()),
                lineend: Some(LineEnd::Mac),
                tab: Some("  ".into()),
                doctype: Some("none".into()),
                language: Some("DE".into()),
                cache: Some(false),
            }
        );
    }

    #[test]
    fn attr_string_rejects_bad_values() {
        assert!(matches!(
            PageOptions::from_attr_str("lineend=amiga"),
            Err(Error::ConfigError(_))
        ));
        assert!(matches!(
            PageOptions::from_attr_str("cache=maybe"),
            Err(Error::ConfigError(_))
        ));
    }

    #[test]
    fn json_accepts_bool_or_string_cache() {
        let a = PageOptions::from_json(r#"{"cache": true, "lineend": "win"}"#).unwrap();
        assert_eq!(a.cache, Some(true));
        assert_eq!(a.lineend, Some(LineEnd::Win));
        let b = PageOptions::from_json(r#"{"cache": "false", "doctype": "XHTML 1.1"}"#).unwrap();
        assert_eq!(b.cache, Some(false));
        assert_eq!(b.doctype.as_deref(), Some("XHTML 1.1"));
        let c = PageOptions::from_json("{}").unwrap();
        assert_eq!(c, PageOptions::default());
    }

    #[test]
    fn line_end_names_ignore_case_in_both_sources() {
        let json = PageOptions::from_json(r#"{"lineend": "WIN"}"#).unwrap();
        let attrs = PageOptions::from_attr_str(r#"lineend="WIN""#).unwrap();
        assert_eq!(json.lineend, Some(LineEnd::Win));
        assert_eq!(json, attrs);
        assert_eq!(
            PageOptions::from_json(r#"{"lineend": "Mac"}"#).unwrap().lineend,
            Some(LineEnd::Mac)
        );
    }

    #[test]
    fn merge_prefers_the_overlay() {
        let mut base = PageOptions::from_json(r#"{"charset": "utf-8", "tab": "  "}"#).unwrap();
        base.merge(PageOptions::from_attr_str(r#"charset="koi8-r" cache=true"#).unwrap());
        assert_eq!(base.charset.as_deref(), Some("koi8-r"));
        assert_eq!(base.tab.as_deref(), Some("  "));
        assert_eq!(base.cache, Some(true));
        assert!(base.doctype.is_none());
    }

    #[test]
    fn json_rejects_unknown_fields_and_bad_flags() {
        assert!(matches!(
            PageOptions::from_json(r#"{"colour": "red"}"#),
            Err(Error::ConfigError(_))
        ));
        assert!(PageOptions::from_json(r#"{"cache": "yes"}"#).is_err());
        assert!(PageOptions::from_json(r#"{"lineend": "dos"}"#).is_err());
    }
}
