//! Integration tests for page assembly and rendering

use std::sync::Arc;

use htmlpage::{
    Attributes, BodyItem, BodyNode, DoctypeTable, Element, Error, Formatting, LineEnd, Page, PageOptions,
    Renderable, StyleContent,
};
use scraper::{Html, Selector};

fn select_texts(html: &str, selector: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let sel = Selector::parse(selector).unwrap();
    document
        .select(&sel)
        .map(|n| n.text().collect::<String>())
        .collect()
}

#[test]
fn test_default_page_end_to_end() {
    let html = Page::new().render().expect("render failed");

    assert!(html.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n"));
    assert!(html.contains(
        "<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Transitional//EN\"\n    \"http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd\">\n"
    ));
    assert!(html.contains("<html xmlns=\"http://www.w3.org/1999/xhtml\" xml:lang=\"en\">\n"));
    assert!(html.contains("<body></body>"));
    assert!(html.ends_with("</html>"));

    assert_eq!(
        select_texts(&html, "title"),
        vec!["New XHTML 1.0 Transitional Compliant Page".to_string()]
    );
}

#[test]
fn test_doctype_strings_round_trip() {
    let all = [
        "HTML 4.01 Strict",
        "HTML 4.01 Transitional",
        "HTML 4.01 Frameset",
        "XHTML 1.0 Strict",
        "XHTML 1.0 Transitional",
        "XHTML 1.0 Frameset",
        "XHTML 1.1",
        "XHTML 2.0",
    ];
    let table = DoctypeTable::builtin();
    for name in all {
        let mut page = Page::new();
        page.set_doctype(&name.to_lowercase()).unwrap();
        assert_eq!(page.doctype_string(), name);
        assert!(table.resolve(page.doctype()).is_ok(), "{} should resolve", name);

        let html = page.render().unwrap();
        assert!(
            html.contains(&format!("<title>New {} Compliant Page</title>", name)),
            "title for {}",
            name
        );
        assert_eq!(html.starts_with("<?xml"), name.starts_with("XHTML"));
    }
}

#[test]
fn test_none_doctype_is_bare() {
    let mut page = Page::new();
    page.set_doctype("none").unwrap();
    page.add_body_content("<p>x</p>");
    let html = page.render().unwrap();

    assert!(!html.contains("<?xml"));
    assert!(!html.contains("<!DOCTYPE"));
    assert!(!html.contains("xmlns"));
    assert!(!html.contains("xml:lang"));
    assert!(html.starts_with("<html>\n<head>\n"));
    assert_eq!(select_texts(&html, "title"), vec!["New Page".to_string()]);
}

#[test]
fn test_title_explicit_overrides_default() {
    let mut page = Page::new();
    assert_eq!(page.title(), "New XHTML 1.0 Transitional Compliant Page");
    page.set_title("X");
    assert_eq!(page.title(), "X");
    assert_eq!(select_texts(&page.render().unwrap(), "title"), vec!["X".to_string()]);
}

#[test]
fn test_body_order_and_unset() {
    let mut page = Page::new();
    page.add_body_content("<p id=\"a\">first</p>");
    page.add_body_content(vec![
        BodyItem::from("<p id=\"b\">second</p>"),
        BodyItem::object(Element::new("p").attr("id", "c").child("third")),
    ]);
    page.add_body_content("<p id=\"d\">fourth</p>");

    let html = page.render().unwrap();
    let texts: Vec<String> = select_texts(&html, "body p")
        .into_iter()
        .map(|t| t.trim().to_string())
        .collect();
    assert_eq!(texts, ["first", "second", "third", "fourth"]);

    page.unset_body();
    let html = page.render().unwrap();
    assert!(html.contains("<body></body>\n</html>"));
    assert!(select_texts(&html, "body p").is_empty());
}

#[test]
fn test_set_body_replaces_content() {
    let mut page = Page::new();
    page.add_body_content("<p>old</p>");
    page.set_body("<p>oops, we have an error</p>");
    let html = page.render().unwrap();
    assert!(!html.contains("old"));
    assert!(html.contains("\t<p>oops, we have an error</p>\n"));
}

#[test]
fn test_meta_kinds_and_overwrite() {
    let mut page = Page::new();
    page.set_meta_data("description", "first", false);
    page.set_meta_data("description", "second", false);
    page.set_meta_data("Content-Language", "en", true);
    let html = page.render().unwrap();

    assert!(html.contains("<meta name=\"description\" content=\"second\" />"));
    assert!(!html.contains("content=\"first\""));
    assert_eq!(html.matches("name=\"description\"").count(), 1);
    assert!(html.contains("<meta http-equiv=\"Content-Language\" content=\"en\" />"));

    let document = Html::parse_document(&html);
    let sel = Selector::parse("meta[http-equiv]").unwrap();
    assert_eq!(document.select(&sel).count(), 1);
}

#[test]
fn test_propagates_formatting_to_objects() {
    struct Probe;

    impl Renderable for Probe {
        fn to_html(&self, fmt: &Formatting) -> Option<String> {
            Some(format!(
                "{}offset={} lnend={}",
                fmt.indent(),
                fmt.offset,
                fmt.line_end
            ))
        }
    }

    let mut page = Page::from_attr_str(r#"lineend="mac" tab="--""#).unwrap();
    page.add_body_content(BodyNode::object(Probe));
    page.add_body_content(vec![BodyItem::object(Probe)]);
    let html = page.render().unwrap();
    assert_eq!(html.matches("--offset=1 lnend=mac\r").count(), 2);
    assert!(!html.contains('\n'));
}

#[test]
fn test_text_only_objects_render_in_body() {
    struct Plain;

    impl Renderable for Plain {
        fn to_text(&self, fmt: &Formatting) -> Option<String> {
            Some(format!("{}plain", fmt.indent()))
        }
    }

    let mut page = Page::new();
    page.add_body_content(BodyNode::object(Plain));
    assert!(page.render().unwrap().contains("<body>\n\tplain\n</body>"));
}

#[test]
fn test_style_object_without_text_is_content_error() {
    struct HtmlOnly;

    impl Renderable for HtmlOnly {
        fn to_html(&self, _fmt: &Formatting) -> Option<String> {
            Some("<b>no</b>".to_string())
        }
    }

    let mut page = Page::new();
    page.set_style_declaration("text/css", StyleContent::object(HtmlOnly));
    match page.render() {
        Err(Error::ContentError(msg)) => assert!(msg.contains("text/css")),
        other => panic!("expected ContentError, got {:?}", other),
    }
}

#[test]
fn test_unsupported_doctype_is_configuration_error() {
    let mut page = Page::new();
    page.set_doctype("XHTML 1.0 Loose").unwrap();
    let err = page.render().unwrap_err();
    assert!(matches!(err, Error::UnsupportedDoctype(_)));
    assert_eq!(
        err.to_string(),
        "Unsupported or illegal document type: \"XHTML 1.0 Loose\""
    );
}

#[test]
fn test_options_from_json_and_attr_string_agree() {
    let from_json = PageOptions::from_json(
        r#"{"charset": "iso-8859-1", "lineend": "win", "doctype": "HTML 4.01 Strict", "language": "fr", "cache": true}"#,
    )
    .unwrap();
    let from_attrs = PageOptions::from_attr_str(
        r#"charset="iso-8859-1" lineend="win" doctype="HTML 4.01 Strict" language="fr" cache="true""#,
    )
    .unwrap();
    assert_eq!(from_json, from_attrs);

    let page = Page::with_options(&from_json).unwrap();
    assert_eq!(page.line_end(), LineEnd::Win);
    let html = page.render().unwrap();
    assert!(html.starts_with("<!DOCTYPE HTML PUBLIC \"-//W3C//DTD HTML 4.01//EN\"\r\n"));
    assert!(html.contains("\r\n<html>\r\n<head>\r\n"));
    assert!(!html.contains("xml:lang"));
}

#[test]
fn test_render_is_repeatable() {
    let mut page = Page::new();
    page.set_doctype("html").unwrap();
    page.add_body_content("<p>same</p>");
    let first = page.render().unwrap();
    let second = page.render().unwrap();
    assert_eq!(first, second);
    assert_eq!(page.doctype_string(), "HTML");

    page.normalize_doctype().unwrap();
    assert_eq!(page.doctype_string(), "HTML 4.01 Transitional");
    assert_eq!(page.render().unwrap(), first);
}

#[test]
fn test_title_getter_matches_rendered_title() {
    for doctype in ["xhtml", "html", "html 4.01", "xhtml 1.0", ""] {
        let mut page = Page::new();
        page.set_doctype(doctype).unwrap();
        let html = page.render().unwrap();
        assert_eq!(select_texts(&html, "title"), vec![page.title()], "doctype {:?}", doctype);
    }
}

#[test]
fn test_custom_doctype_table_renders_through_page() {
    let table = DoctypeTable::from_json(
        r#"{
            "declarations": { "html": { "5": { "": ["<!DOCTYPE html>"] } } },
            "defaults": { "default": "html 5", "types": { "html": "html 5" } }
        }"#,
    )
    .unwrap();
    let mut page = Page::new().with_doctypes(Arc::new(table));

    // The stock XHTML 1.0 Transitional selection is absent from this table.
    assert!(matches!(page.render(), Err(Error::UnsupportedDoctype(_))));

    page.set_doctype("html").unwrap();
    let html = page.render().unwrap();
    assert!(html.starts_with("<!DOCTYPE html>\n<html>\n<head>\n"));
    assert!(!html.contains("<?xml"));
    assert_eq!(page.title(), "New HTML 5 Compliant Page");
    assert_eq!(select_texts(&html, "title"), vec![page.title()]);
}

#[test]
fn test_body_attributes_render_on_body_tag() {
    let mut page = Page::new();
    page.set_body_attributes(
        Attributes::parse(r#"onload="init()" class='home' bgcolor=white"#).unwrap(),
    );
    page.update_body_attributes(&Attributes::parse(r#"class="landing" id="top""#).unwrap());
    assert_eq!(page.remove_body_attribute("BGCOLOR").as_deref(), Some("white"));
    page.add_body_content("<p>hi</p>");

    let html = page.render().unwrap();
    assert!(html.contains(
        "<body onload=\"init()\" class=\"landing\" id=\"top\">\n\t<p>hi</p>\n</body>"
    ));

    let document = Html::parse_document(&html);
    let body = document.select(&Selector::parse("body").unwrap()).next().unwrap();
    assert_eq!(body.value().attr("class"), Some("landing"));
    assert_eq!(body.value().attr("bgcolor"), None);
}
