//! Document type selection and the table of `<!DOCTYPE>` declarations.
//!
//! A [`Doctype`] is the `(type, version, variant)` triple picked by the user,
//! e.g. `XHTML 1.0 Strict`. Any part may be missing; [`DoctypeTable::resolve`]
//! fills the gaps from the table's defaults until it reaches a concrete
//! declaration.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, OnceLock};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Upper bound on default-table hops while resolving a doctype.
const MAX_FALLBACK_HOPS: usize = 4;

/// A possibly partial document type selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Doctype {
    pub kind: Option<String>,
    pub version: Option<String>,
    pub variant: Option<String>,
}

impl Doctype {
    pub fn new(kind: &str, version: Option<&str>, variant: Option<&str>) -> Self {
        let norm = |s: &str| Some(s.trim().to_lowercase()).filter(|s| !s.is_empty());
        Self {
            kind: norm(kind),
            version: version.and_then(norm),
            variant: variant.and_then(norm),
        }
    }

    /// Whether the root element should carry the XHTML namespace.
    pub fn is_xhtml(&self) -> bool {
        self.kind.as_deref() == Some("xhtml")
    }
}

impl FromStr for Doctype {
    type Err = Error;

    /// Parses `"XHTML 1.0 Strict"`-style strings. Parts are split on
    /// whitespace and lower-cased; an empty string selects nothing and
    /// resolves to the table's global default.
    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<String> = s.split_whitespace().map(str::to_lowercase).collect();
        if parts.len() > 3 {
            return Err(Error::UnsupportedDoctype(s.trim().to_string()));
        }
        let mut parts = parts.into_iter();
        Ok(Self {
            kind: parts.next(),
            version: parts.next(),
            variant: parts.next(),
        })
    }
}

fn ucfirst(s: &str) -> String {
    let lower = s.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl fmt::Display for Doctype {
    /// Normalized form: `XHTML 1.0 Transitional`, `HTML 4.01 Strict`, `XHTML 1.1`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::with_capacity(3);
        if let Some(kind) = &self.kind {
            parts.push(kind.to_uppercase());
        }
        if let Some(version) = &self.version {
            parts.push(ucfirst(version));
        }
        if let Some(variant) = &self.variant {
            parts.push(ucfirst(variant));
        }
        f.write_str(&parts.join(" "))
    }
}

/// A doctype selection resolved to a concrete declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDoctype<'a> {
    pub doctype: Doctype,
    /// Literal lines of the `<!DOCTYPE ...>` declaration.
    pub lines: &'a [String],
}

/// Fallback targets used when a selection is incomplete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctypeDefaults {
    /// Used when no type is given at all.
    pub default: String,
    /// type -> doctype string
    #[serde(default)]
    pub types: BTreeMap<String, String>,
    /// type -> version -> doctype string
    #[serde(default)]
    pub versions: BTreeMap<String, BTreeMap<String, String>>,
}

/// Immutable table of doctype declarations plus the default-fallback table.
///
/// Declarations are keyed type -> version -> variant; a version with no
/// variants (XHTML 1.1) is stored under the empty variant `""`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctypeTable {
    pub declarations: BTreeMap<String, BTreeMap<String, BTreeMap<String, Vec<String>>>>,
    pub defaults: DoctypeDefaults,
}

static BUILTIN: OnceLock<Arc<DoctypeTable>> = OnceLock::new();

impl DoctypeTable {
    /// The shared built-in table covering HTML 4.01 and XHTML 1.0/1.1/2.0.
    pub fn builtin() -> Arc<DoctypeTable> {
        BUILTIN.get_or_init(|| Arc::new(Self::build_builtin())).clone()
    }

    /// Loads a table from JSON with the same shape as the serialized form.
    pub fn from_json(json: &str) -> Result<Self> {
        let table: DoctypeTable = serde_json::from_str(json)?;
        Ok(table)
    }

    fn build_builtin() -> Self {
        let mut table = DoctypeTable {
            declarations: BTreeMap::new(),
            defaults: DoctypeDefaults {
                default: "xhtml 1.0 transitional".to_string(),
                types: BTreeMap::new(),
                versions: BTreeMap::new(),
            },
        };

        let html4 = [
            ("strict", "-//W3C//DTD HTML 4.01//EN", "strict.dtd"),
            ("transitional", "-//W3C//DTD HTML 4.01 Transitional//EN", "loose.dtd"),
            ("frameset", "-//W3C//DTD HTML 4.01 Frameset//EN", "frameset.dtd"),
        ];
        for (variant, fpi, dtd) in html4 {
            table.insert(
                "html",
                "4.01",
                variant,
                &[
                    &format!("<!DOCTYPE HTML PUBLIC \"{}\"", fpi),
                    &format!("    \"http://www.w3.org/TR/html4/{}\">", dtd),
                ],
            );
        }

        for variant in ["strict", "transitional", "frameset"] {
            table.insert(
                "xhtml",
                "1.0",
                variant,
                &[
                    &format!(
                        "<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 {}//EN\"",
                        ucfirst(variant)
                    ),
                    &format!(
                        "    \"http://www.w3.org/TR/xhtml1/DTD/xhtml1-{}.dtd\">",
                        variant
                    ),
                ],
            );
        }
        table.insert(
            "xhtml",
            "1.1",
            "",
            &[
                "<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.1//EN\"",
                "    \"http://www.w3.org/TR/xhtml11/DTD/xhtml11.dtd\">",
            ],
        );
        table.insert(
            "xhtml",
            "2.0",
            "",
            &[
                "<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 2.0//EN\"",
                "    \"http://www.w3.org/TR/xhtml2/DTD/xhtml2.dtd\">",
            ],
        );

        let defaults = &mut table.defaults;
        defaults
            .types
            .insert("xhtml".into(), "xhtml 1.0 transitional".into());
        defaults
            .types
            .insert("html".into(), "html 4.01 transitional".into());
        let xhtml = defaults.versions.entry("xhtml".into()).or_default();
        xhtml.insert("1.0".into(), "xhtml 1.0 transitional".into());
        xhtml.insert("1.1".into(), "xhtml 1.1".into());
        xhtml.insert("2.0".into(), "xhtml 2.0".into());
        defaults
            .versions
            .entry("html".into())
            .or_default()
            .insert("4.01".into(), "html 4.01 transitional".into());

        table
    }

    fn insert(&mut self, kind: &str, version: &str, variant: &str, lines: &[&str]) {
        self.declarations
            .entry(kind.to_string())
            .or_default()
            .entry(version.to_string())
            .or_default()
            .insert(
                variant.to_string(),
                lines.iter().map(|l| l.to_string()).collect(),
            );
    }

    /// Exact declaration lookup; `variant` is `""` for unvariant versions.
    pub fn lookup(&self, kind: &str, version: &str, variant: &str) -> Option<&[String]> {
        self.declarations
            .get(kind)?
            .get(version)?
            .get(variant)
            .map(Vec::as_slice)
            .filter(|lines| !lines.is_empty())
    }

    /// Resolves a selection to a concrete declaration.
    ///
    /// A fully specified selection must match exactly. A selection with only
    /// a type, or a type and version, is completed from the default table and
    /// resolved again. Anything that cannot be completed is an
    /// [`Error::UnsupportedDoctype`].
    ///
    /// # Examples
    ///
    /// ```
    /// use htmlpage::{Doctype, DoctypeTable};
    ///
    /// let table = DoctypeTable::builtin();
    /// let resolved = table.resolve(&"html".parse::<Doctype>().unwrap()).unwrap();
    /// assert_eq!(resolved.doctype.to_string(), "HTML 4.01 Transitional");
    /// ```
    pub fn resolve(&self, doctype: &Doctype) -> Result<ResolvedDoctype<'_>> {
        self.resolve_at(doctype, doctype, 0)
    }

    fn resolve_at(
        &self,
        requested: &Doctype,
        doctype: &Doctype,
        hops: usize,
    ) -> Result<ResolvedDoctype<'_>> {
        let unsupported = || Error::UnsupportedDoctype(requested.to_string());
        if hops > MAX_FALLBACK_HOPS {
            return Err(unsupported());
        }

        let target = match (&doctype.kind, &doctype.version, &doctype.variant) {
            (Some(kind), Some(version), Some(variant)) => {
                let lines = self.lookup(kind, version, variant).ok_or_else(unsupported)?;
                return Ok(ResolvedDoctype {
                    doctype: doctype.clone(),
                    lines,
                });
            }
            (Some(kind), Some(version), None) => {
                if let Some(lines) = self.lookup(kind, version, "") {
                    return Ok(ResolvedDoctype {
                        doctype: doctype.clone(),
                        lines,
                    });
                }
                self.defaults
                    .versions
                    .get(kind)
                    .and_then(|versions| versions.get(version))
            }
            (Some(kind), None, _) => self.defaults.types.get(kind),
            (None, ..) => Some(&self.defaults.default),
        };

        let target = target.ok_or_else(unsupported)?;
        let next: Doctype = target.parse()?;
        if next == *doctype {
            return Err(unsupported());
        }
        debug!("doctype \"{}\" falls back to \"{}\"", doctype, next);
        self.resolve_at(requested, &next, hops + 1)
    }
}
