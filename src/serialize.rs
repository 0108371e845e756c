//! Serializes a [`Page`] into a document string.
//!
//! Output order is fixed: XML declaration and doctype (skipped in simple
//! mode), the `<html>` root, `<head>`, `<body>`, closing `</html>`. Every
//! line ends with the page's line ending except the final `</html>`.

use log::{trace, warn};

use crate::attributes::escape_attr;
use crate::content::{BodyItem, BodyNode, Renderable, StyleContent};
use crate::format::Formatting;
use crate::page::{MetaKind, Page};
use crate::{Error, Result};

/// Namespace of the XHTML root element.
pub const XHTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Offset handed to objects placed in the body.
const BODY_OFFSET: usize = 1;

/// Offset handed to objects inside a `<style>` block.
const STYLE_OFFSET: usize = 3;

/// Renders the whole page. Fails without partial output if the doctype
/// cannot be resolved or a style object has no text form.
pub fn render_page(page: &Page) -> Result<String> {
    trace!("rendering page ({})", page.doctype());
    let ln = page.line_end().as_str();
    let mut out = String::new();

    let title = if page.is_simple() {
        out.push_str("<html>");
        out.push_str(ln);
        page.title()
    } else {
        let resolved = page.doctypes().resolve(page.doctype())?;
        let xhtml = resolved.doctype.is_xhtml();
        if xhtml {
            out.push_str(&format!(
                "<?xml version=\"1.0\" encoding=\"{}\"?>",
                escape_attr(page.charset())
            ));
            out.push_str(ln);
        }
        for line in resolved.lines {
            out.push_str(line);
            out.push_str(ln);
        }
        if xhtml {
            out.push_str(&format!(
                "<html xmlns=\"{}\" xml:lang=\"{}\">",
                XHTML_NAMESPACE,
                escape_attr(page.lang())
            ));
        } else {
            out.push_str("<html>");
        }
        out.push_str(ln);
        page.title_for(&resolved.doctype)
    };

    out.push_str(&render_head(page, &title)?);
    out.push_str(&render_body(page));
    out.push_str("</html>");
    trace!("rendered {} bytes", out.len());
    Ok(out)
}

/// Renders the `<head>` section with the given title.
pub fn render_head(page: &Page, title: &str) -> Result<String> {
    let ln = page.line_end().as_str();
    let tab = page.tab();
    let mut out = String::new();

    out.push_str("<head>");
    out.push_str(ln);
    out.push_str(&format!("{}<title>{}</title>{}", tab, title, ln));

    for (kind, attr) in [(MetaKind::Standard, "name"), (MetaKind::HttpEquiv, "http-equiv")] {
        for (name, content) in page.meta_tags(kind) {
            out.push_str(&format!(
                "{}<meta {}=\"{}\" content=\"{}\" />{}",
                tab,
                attr,
                escape_attr(name),
                escape_attr(content),
                ln
            ));
        }
    }

    for href in page.style_sheets() {
        out.push_str(&format!(
            "{}<link rel=\"stylesheet\" href=\"{}\" type=\"text/css\" />{}",
            tab,
            escape_attr(href),
            ln
        ));
    }

    let style_fmt = page.formatting().nested(STYLE_OFFSET);
    for (mime_type, content) in page.style_declarations() {
        let body = match content {
            StyleContent::Text(text) => text.clone(),
            StyleContent::Object(object) => object.to_text(&style_fmt).ok_or_else(|| {
                Error::ContentError(format!(
                    "object in the \"{}\" style block has no text form",
                    mime_type
                ))
            })?,
        };
        out.push_str(&format!("{}<style type=\"{}\">{}", tab, escape_attr(mime_type), ln));
        out.push_str(&format!("{}{}<!--{}", tab, tab, ln));
        out.push_str(&body);
        out.push_str(ln);
        out.push_str(&format!("{}{}-->{}", tab, tab, ln));
        out.push_str(&format!("{}</style>{}", tab, ln));
    }

    for script in page.scripts() {
        out.push_str(&format!(
            "{}<script type=\"{}\" src=\"{}\"></script>{}",
            tab,
            escape_attr(&script.mime_type),
            escape_attr(&script.src),
            ln
        ));
    }

    out.push_str("</head>");
    out.push_str(ln);
    Ok(out)
}

/// Renders the `<body>` section. An empty body renders as `<body></body>`.
pub fn render_body(page: &Page) -> String {
    let ln = page.line_end().as_str();
    let attrs = page.body_attributes();
    let open = if attrs.is_empty() {
        "<body>".to_string()
    } else {
        format!("<body {}>", attrs.to_attr_string())
    };

    if page.body().is_empty() {
        return format!("{}</body>{}", open, ln);
    }

    let fmt = page.formatting().nested(BODY_OFFSET);
    let mut out = open;
    out.push_str(ln);
    for node in page.body() {
        match node {
            BodyNode::Text(text) => push_text(&mut out, &fmt, text),
            BodyNode::Object(object) => push_object(&mut out, &fmt, &**object),
            BodyNode::Group(items) => {
                for item in items {
                    match item {
                        BodyItem::Text(text) => push_text(&mut out, &fmt, text),
                        BodyItem::Object(object) => push_object(&mut out, &fmt, &**object),
                    }
                }
            }
        }
    }
    out.push_str("</body>");
    out.push_str(ln);
    out
}

fn push_text(out: &mut String, fmt: &Formatting, text: &str) {
    out.push_str(&fmt.tab);
    out.push_str(text);
    out.push_str(fmt.lnend());
}

fn push_object(out: &mut String, fmt: &Formatting, object: &dyn Renderable) {
    match object.to_html(fmt).or_else(|| object.to_text(fmt)) {
        Some(html) => {
            out.push_str(&html);
            out.push_str(fmt.lnend());
        }
        None => warn!("skipping body object with neither an HTML nor a text form"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Element;
    use crate::format::LineEnd;

    struct Css(&'static str);

    impl Renderable for Css {
        fn to_text(&self, fmt: &Formatting) -> Option<String> {
            Some(format!("{}{}", fmt.indent(), self.0))
        }
    }

    struct Opaque;

    impl Renderable for Opaque {}

    #[test]
    fn head_lists_everything_in_order() {
        let mut page = Page::new();
        page.set_tab("  ");
        page.set_meta_data("Expires", "0", true);
        page.set_meta_data("author", "Me & You", false);
        page.add_style_sheet("a.css");
        page.add_style_sheet("a.css");
        page.add_style_declaration("p { margin: 0 }");
        page.add_script("app.js");
        page.add_script_typed("legacy.vbs", "text/vbscript");

        let head = render_head(&page, "T").unwrap();
        let expected = [
            "<head>",
            "  <title>T</title>",
            "  <meta name=\"Generator\" content=\"htmlpage\" />",
            "  <meta name=\"author\" content=\"Me &amp; You\" />",
            "  <meta http-equiv=\"Expires\" content=\"0\" />",
            "  <link rel=\"stylesheet\" href=\"a.css\" type=\"text/css\" />",
            "  <link rel=\"stylesheet\" href=\"a.css\" type=\"text/css\" />",
            "  <style type=\"text/css\">",
            "    <!--",
            "p { margin: 0 }",
            "    -->",
            "  </style>",
            "  <script type=\"text/javascript\" src=\"app.js\"></script>",
            "  <script type=\"text/vbscript\" src=\"legacy.vbs\"></script>",
            "</head>",
            "",
        ]
        .join("\n");
        assert_eq!(head, expected);
    }

    #[test]
    fn style_objects_get_style_offset() {
        let mut page = Page::new();
        page.set_tab(" ");
        page.add_style_declaration(StyleContent::object(Css("body {}")));
        let head = render_head(&page, "T").unwrap();
        assert!(head.contains("  <!--\n   body {}\n  -->\n"));
    }

    #[test]
    fn style_object_without_text_form_fails() {
        let mut page = Page::new();
        page.add_style_declaration(StyleContent::object(Opaque));
        assert!(matches!(
            render_head(&page, "T"),
            Err(Error::ContentError(_))
        ));
        assert!(matches!(page.render(), Err(Error::ContentError(_))));
    }

    #[test]
    fn body_renders_nodes_in_order() {
        let mut page = Page::new();
        page.set_line_end(LineEnd::Win);
        page.update_body_attribute("onload", "init()");
        page.add_body_content("<h1>One</h1>");
        page.add_body_content(BodyNode::object(Element::new("p").child("two")));
        page.add_body_content(vec![
            BodyItem::from("<hr />"),
            BodyItem::object(Element::new("br")),
            BodyItem::object(Opaque),
        ]);
        assert_eq!(
            render_body(&page),
            "<body onload=\"init()\">\r\n\
             \t<h1>One</h1>\r\n\
             \t<p>\r\n\t\ttwo\r\n\t</p>\r\n\
             \t<hr />\r\n\
             \t<br></br>\r\n\
             </body>\r\n"
        );
    }

    #[test]
    fn empty_body() {
        let mut page = Page::new();
        assert_eq!(render_body(&page), "<body></body>\n");
        page.add_body_content("x");
        page.unset_body();
        assert_eq!(render_body(&page), "<body></body>\n");
    }

    #[test]
    fn html4_has_no_xml_declaration() {
        let mut page = Page::new();
        page.set_doctype("HTML 4.01 Strict").unwrap();
        let html = page.render().unwrap();
        assert!(html.starts_with("<!DOCTYPE HTML PUBLIC \"-//W3C//DTD HTML 4.01//EN\"\n"));
        assert!(html.contains("strict.dtd\">\n<html>\n<head>\n"));
        assert!(html.contains("<title>New HTML 4.01 Strict Compliant Page</title>"));
    }

    #[test]
    fn partial_doctype_title_uses_resolved_doctype() {
        let mut page = Page::new();
        page.set_doctype("xhtml").unwrap();
        let html = page.render().unwrap();
        assert!(html.contains("<title>New XHTML 1.0 Transitional Compliant Page</title>"));
        assert_eq!(page.doctype_string(), "XHTML");
    }

    #[test]
    fn unresolvable_doctype_fails_render() {
        let mut page = Page::new();
        page.set_doctype("XHTML 9.9 Shiny").unwrap();
        match page.render() {
            Err(Error::UnsupportedDoctype(name)) => assert_eq!(name, "XHTML 9.9 Shiny"),
            other => panic!("unexpected {:?}", other),
        }
    }
}
