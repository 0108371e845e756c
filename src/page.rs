//! The page model: configuration plus head and body collections.

use std::sync::Arc;

use url::Url;

use crate::attributes::Attributes;
use crate::content::{BodyNode, StyleContent};
use crate::doctype::{Doctype, DoctypeTable};
use crate::format::{Formatting, LineEnd};
use crate::options::PageOptions;
use crate::{serialize, Error, Result};

/// Value of the `Generator` meta tag every page starts with.
pub const GENERATOR: &str = "htmlpage";

/// MIME type used when none is given for style blocks.
pub const TEXT_CSS: &str = "text/css";

/// MIME type used when none is given for scripts.
pub const TEXT_JAVASCRIPT: &str = "text/javascript";

/// The two kinds of `<meta>` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaKind {
    /// `<meta name="..." content="...">`
    Standard,
    /// `<meta http-equiv="..." content="...">`
    HttpEquiv,
}

/// A linked script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    pub mime_type: String,
    pub src: String,
}

/// Where a meta refresh should send the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshTarget {
    /// An absolute URL.
    Url(String),
    /// The URL of the request currently being answered.
    Current {
        https: bool,
        host: String,
        request_uri: String,
    },
}

/// An HTML or XHTML page under construction.
///
/// ```
/// use htmlpage::Page;
///
/// let mut page = Page::new();
/// page.set_title("Hello");
/// page.add_body_content("<p>some text</p>");
/// let html = page.render().unwrap();
/// assert!(html.contains("<title>Hello</title>"));
/// assert!(html.contains("\t<p>some text</p>\n"));
/// ```
#[derive(Debug)]
pub struct Page {
    charset: String,
    language: String,
    cache: bool,
    doctype: Doctype,
    simple: bool,
    line_end: LineEnd,
    tab: String,
    title: Option<String>,
    standard_meta: Vec<(String, String)>,
    http_equiv_meta: Vec<(String, String)>,
    style_sheets: Vec<String>,
    styles: Vec<(String, StyleContent)>,
    scripts: Vec<Script>,
    body: Vec<BodyNode>,
    body_attributes: Attributes,
    doctypes: Arc<DoctypeTable>,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            charset: "utf-8".to_string(),
            language: "en".to_string(),
            cache: false,
            doctype: Doctype::new("xhtml", Some("1.0"), Some("transitional")),
            simple: false,
            line_end: LineEnd::Unix,
            tab: "\t".to_string(),
            title: None,
            standard_meta: vec![("Generator".to_string(), GENERATOR.to_string())],
            http_equiv_meta: Vec::new(),
            style_sheets: Vec::new(),
            styles: Vec::new(),
            scripts: Vec::new(),
            body: Vec::new(),
            body_attributes: Attributes::new(),
            doctypes: DoctypeTable::builtin(),
        }
    }
}

impl Page {
    /// An empty XHTML 1.0 Transitional page.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a page from options, applying them in the order line ending,
    /// charset, indentation, doctype, language, cache.
    pub fn with_options(opts: &PageOptions) -> Result<Self> {
        let mut page = Page::new();
        if let Some(line_end) = opts.lineend {
            page.set_line_end(line_end);
        }
        if let Some(charset) = &opts.charset {
            page.set_charset(charset);
        }
        if let Some(tab) = &opts.tab {
            page.set_tab(tab);
        }
        if let Some(doctype) = opts.doctype.as_deref().filter(|d| !d.trim().is_empty()) {
            page.set_doctype(doctype)?;
        }
        if let Some(language) = &opts.language {
            page.set_lang(language);
        }
        if let Some(cache) = opts.cache {
            page.set_cache(cache);
        }
        Ok(page)
    }

    /// Builds a page from an attribute string such as
    /// `doctype="HTML 4.01 Strict" lineend="win"`.
    pub fn from_attr_str(attrs: &str) -> Result<Self> {
        Self::with_options(&PageOptions::from_attr_str(attrs)?)
    }

    /// Replaces the doctype table used for resolution.
    pub fn with_doctypes(mut self, doctypes: Arc<DoctypeTable>) -> Self {
        self.doctypes = doctypes;
        self
    }

    pub fn doctypes(&self) -> &DoctypeTable {
        &self.doctypes
    }

    pub fn set_charset(&mut self, charset: &str) {
        self.charset = charset.to_string();
    }

    pub fn charset(&self) -> &str {
        &self.charset
    }

    /// Sets the document language; stored lower-cased.
    pub fn set_lang(&mut self, lang: &str) {
        self.language = lang.to_lowercase();
    }

    pub fn lang(&self) -> &str {
        &self.language
    }

    /// Whether browsers may cache the page. Defaults to `false`.
    pub fn set_cache(&mut self, cache: bool) {
        self.cache = cache;
    }

    pub fn is_cacheable(&self) -> bool {
        self.cache
    }

    /// Selects the doctype from a string like `"XHTML 1.0 Strict"`.
    ///
    /// `"none"` switches to simple mode: no XML declaration, no doctype and a
    /// bare `<html>` root. The selection is checked against the doctype table
    /// when the page is rendered.
    pub fn set_doctype(&mut self, doctype: &str) -> Result<()> {
        if doctype.trim().eq_ignore_ascii_case("none") {
            self.simple = true;
            return Ok(());
        }
        self.doctype = doctype.parse()?;
        self.simple = false;
        Ok(())
    }

    pub fn doctype(&self) -> &Doctype {
        &self.doctype
    }

    /// Whether the page renders without a doctype (`doctype="none"`).
    pub fn is_simple(&self) -> bool {
        self.simple
    }

    /// The current selection in normalized form, e.g. `XHTML 1.0 Transitional`.
    pub fn doctype_string(&self) -> String {
        self.doctype.to_string()
    }

    /// Completes a partial doctype selection (`"xhtml"`, `"html 4.01"`) from
    /// the doctype table and stores the fully specified result.
    pub fn normalize_doctype(&mut self) -> Result<()> {
        let resolved = self.doctypes.resolve(&self.doctype)?.doctype;
        self.doctype = resolved;
        Ok(())
    }

    pub fn set_line_end(&mut self, line_end: LineEnd) {
        self.line_end = line_end;
    }

    pub fn line_end(&self) -> LineEnd {
        self.line_end
    }

    /// Sets the indentation unit (a tab by default).
    pub fn set_tab(&mut self, tab: &str) {
        self.tab = tab.to_string();
    }

    pub fn tab(&self) -> &str {
        &self.tab
    }

    /// Top-level formatting for this page (offset 0).
    pub fn formatting(&self) -> Formatting {
        Formatting::new(self.line_end, self.tab.clone())
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_string());
    }

    /// The explicit title, or one derived from the resolved doctype:
    /// `New XHTML 1.0 Transitional Compliant Page`, or `New Page` in simple mode.
    /// An unresolvable selection is named as given.
    pub fn title(&self) -> String {
        match self.doctypes.resolve(&self.doctype) {
            Ok(resolved) => self.title_for(&resolved.doctype),
            Err(_) => self.title_for(&self.doctype),
        }
    }

    pub(crate) fn title_for(&self, doctype: &Doctype) -> String {
        match &self.title {
            Some(title) if !title.is_empty() => title.clone(),
            _ if self.simple => "New Page".to_string(),
            _ => format!("New {} Compliant Page", doctype),
        }
    }

    /// Sets or replaces a meta tag.
    pub fn set_meta_data(&mut self, name: &str, content: &str, http_equiv: bool) {
        let tags = if http_equiv {
            &mut self.http_equiv_meta
        } else {
            &mut self.standard_meta
        };
        match tags.iter_mut().find(|(n, _)| n == name) {
            Some(tag) => tag.1 = content.to_string(),
            None => tags.push((name.to_string(), content.to_string())),
        }
    }

    pub fn meta_data(&self, name: &str, http_equiv: bool) -> Option<&str> {
        self.meta_tags(if http_equiv {
            MetaKind::HttpEquiv
        } else {
            MetaKind::Standard
        })
        .find(|(n, _)| *n == name)
        .map(|(_, content)| content)
    }

    /// Meta tags of one kind in insertion order.
    pub fn meta_tags(&self, kind: MetaKind) -> impl Iterator<Item = (&str, &str)> {
        let tags = match kind {
            MetaKind::Standard => &self.standard_meta,
            MetaKind::HttpEquiv => &self.http_equiv_meta,
        };
        tags.iter().map(|(n, c)| (n.as_str(), c.as_str()))
    }

    /// Sets the `Refresh` http-equiv tag to `"<seconds>; url=<url>"`.
    ///
    /// The target must form an absolute URL; for
    /// [`RefreshTarget::Current`] it is assembled from the request's host
    /// and URI. The URL is written as given, not in normalized form.
    pub fn set_meta_refresh(&mut self, seconds: u32, target: RefreshTarget) -> Result<()> {
        let raw = match target {
            RefreshTarget::Url(url) => url,
            RefreshTarget::Current {
                https,
                host,
                request_uri,
            } => {
                let scheme = if https { "https" } else { "http" };
                let sep = if request_uri.starts_with('/') { "" } else { "/" };
                format!("{}://{}{}{}", scheme, host, sep, request_uri)
            }
        };
        Url::parse(&raw).map_err(|e| {
            Error::ConfigError(format!("invalid refresh URL \"{}\": {}", raw, e))
        })?;
        self.set_meta_data("Refresh", &format!("{}; url={}", seconds, raw), true);
        Ok(())
    }

    /// Adds a linked stylesheet. Duplicates are kept.
    pub fn add_style_sheet(&mut self, url: &str) {
        self.style_sheets.push(url.to_string());
    }

    pub fn style_sheets(&self) -> &[String] {
        &self.style_sheets
    }

    /// Sets the inline `text/css` block.
    pub fn add_style_declaration(&mut self, content: impl Into<StyleContent>) {
        self.set_style_declaration(TEXT_CSS, content);
    }

    /// Sets the inline style block for `mime_type`; one block per type.
    pub fn set_style_declaration(&mut self, mime_type: &str, content: impl Into<StyleContent>) {
        let content = content.into();
        match self.styles.iter_mut().find(|(t, _)| t == mime_type) {
            Some(entry) => entry.1 = content,
            None => self.styles.push((mime_type.to_string(), content)),
        }
    }

    pub fn style_declarations(&self) -> &[(String, StyleContent)] {
        &self.styles
    }

    /// Links a `text/javascript` script.
    pub fn add_script(&mut self, src: &str) {
        self.add_script_typed(src, TEXT_JAVASCRIPT);
    }

    pub fn add_script_typed(&mut self, src: &str, mime_type: &str) {
        self.scripts.push(Script {
            mime_type: mime_type.to_string(),
            src: src.to_string(),
        });
    }

    pub fn scripts(&self) -> &[Script] {
        &self.scripts
    }

    /// Appends to the body.
    pub fn add_body_content(&mut self, content: impl Into<BodyNode>) {
        self.body.push(content.into());
    }

    /// Replaces the whole body with `content`.
    pub fn set_body(&mut self, content: impl Into<BodyNode>) {
        self.unset_body();
        self.body.push(content.into());
    }

    /// Empties the body.
    pub fn unset_body(&mut self) {
        self.body.clear();
    }

    pub fn body(&self) -> &[BodyNode] {
        &self.body
    }

    /// Replaces the attributes of the `<body>` tag.
    pub fn set_body_attributes(&mut self, attributes: Attributes) {
        self.body_attributes = attributes;
    }

    pub fn update_body_attribute(&mut self, name: &str, value: &str) {
        self.body_attributes.set(name, value);
    }

    /// Merges `attributes` into the `<body>` tag; the new values win.
    pub fn update_body_attributes(&mut self, attributes: &Attributes) {
        self.body_attributes.update(attributes);
    }

    pub fn remove_body_attribute(&mut self, name: &str) -> Option<String> {
        self.body_attributes.remove(name)
    }

    pub fn body_attributes(&self) -> &Attributes {
        &self.body_attributes
    }

    /// Renders the complete document. Nothing is returned unless every part
    /// rendered successfully.
    pub fn render(&self) -> Result<String> {
        serialize::render_page(self)
    }
}
