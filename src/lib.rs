//! htmlpage
//!
//! A small object model for assembling an HTML or XHTML page (doctype, head
//! metadata, stylesheets, scripts and body content) and serializing it to a
//! string with configurable line endings and indentation.
//!
//! # Features
//!
//! - **Doctypes**: HTML 4.01 and XHTML 1.0/1.1/2.0 out of the box, partial
//!   selections (`"xhtml"`, `"html 4.01"`) completed from a default table,
//!   or `"none"` for a bare `<html>` page
//! - **Mixed body content**: strings, [`Renderable`] objects and one-level
//!   groups of either
//! - **Pure rendering**: [`Page::render`] never writes anywhere;
//!   [`Page::send`] adds response headers and writes to a stream
//!
//! # Example
//!
//! ```
//! use htmlpage::{LineEnd, Page, PageOptions};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let opts = PageOptions {
//!     doctype: Some("XHTML 1.0 Strict".to_string()),
//!     lineend: Some(LineEnd::Unix),
//!     tab: Some("  ".to_string()),
//!     ..Default::default()
//! };
//!
//! let mut page = Page::with_options(&opts)?;
//! page.set_title("My page");
//! page.set_meta_data("author", "My Name", false);
//! page.add_body_content("<p>some text</p>");
//!
//! let html = page.render()?;
//! assert!(html.contains("XHTML 1.0 Strict//EN"));
//! assert!(html.contains("  <p>some text</p>"));
//! # Ok(())
//! # }
//! ```

pub mod attributes;
pub mod content;
pub mod doctype;
pub mod error;
pub mod format;
pub mod options;
pub mod page;
pub mod response;
pub mod serialize;

pub use attributes::Attributes;
pub use content::{BodyItem, BodyNode, Element, Renderable, StyleContent};
pub use doctype::{Doctype, DoctypeTable, ResolvedDoctype};
pub use error::{Error, Result};
pub use format::{Formatting, LineEnd};
pub use options::PageOptions;
pub use page::{MetaKind, Page, RefreshTarget, Script};
