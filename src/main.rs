use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Context};
use clap::Parser;
use log::debug;

use htmlpage::{Attributes, LineEnd, Page, PageOptions, RefreshTarget, StyleContent};

/// Assemble an HTML/XHTML page from the command line and print it.
#[derive(Parser, Debug)]
#[command(name = "htmlpage", version, about, long_about = None)]
struct Cli {
    /// Body content, one line per argument, in order.
    body: Vec<String>,

    /// Read page options from a JSON file.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Page options as an attribute string, e.g. 'doctype="HTML 4.01 Strict" lineend="win"'.
    #[arg(long, value_name = "ATTRS")]
    attrs: Option<String>,

    /// Doctype such as "XHTML 1.0 Strict", or "none".
    #[arg(long)]
    doctype: Option<String>,

    /// Character encoding.
    #[arg(long)]
    charset: Option<String>,

    /// Document language.
    #[arg(long)]
    lang: Option<String>,

    /// Line ending style: unix, win or mac.
    #[arg(long, value_name = "STYLE")]
    lineend: Option<String>,

    /// Indentation unit.
    #[arg(long, value_name = "STRING")]
    tab: Option<String>,

    /// Allow browsers to cache the page.
    #[arg(long)]
    cache: bool,

    /// Page title.
    #[arg(long)]
    title: Option<String>,

    /// Standard meta tag.
    #[arg(long, value_name = "NAME=CONTENT")]
    meta: Vec<String>,

    /// http-equiv meta tag.
    #[arg(long = "http-equiv", value_name = "NAME=CONTENT")]
    http_equiv: Vec<String>,

    /// Refresh after SECONDS, going to URL.
    #[arg(long, value_name = "SECONDS=URL")]
    refresh: Option<String>,

    /// Linked stylesheet URL.
    #[arg(long, value_name = "URL")]
    stylesheet: Vec<String>,

    /// Linked script URL.
    #[arg(long, value_name = "URL")]
    script: Vec<String>,

    /// Inline text/css block read from a file.
    #[arg(long, value_name = "FILE")]
    style_file: Option<PathBuf>,

    /// Attributes of the <body> tag, e.g. 'onload="init()" class="home"'.
    #[arg(long, value_name = "ATTRS")]
    body_attrs: Option<String>,

    /// Body content read from a file, added before the positional content.
    #[arg(long, value_name = "FILE")]
    body_file: Vec<PathBuf>,

    /// Prefix the document with response headers.
    #[arg(long)]
    send: bool,

    /// Write to a file instead of stdout.
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,
}

fn split_pair<'a>(arg: &'a str, flag: &str) -> anyhow::Result<(&'a str, &'a str)> {
    arg.split_once('=')
        .ok_or_else(|| anyhow!("--{} expects NAME=VALUE, got \"{}\"", flag, arg))
}

fn options(cli: &Cli) -> anyhow::Result<PageOptions> {
    let mut opts = match &cli.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            PageOptions::from_json(&json).with_context(|| format!("parsing {}", path.display()))?
        }
        None => PageOptions::default(),
    };
    if let Some(attrs) = &cli.attrs {
        opts.merge(PageOptions::from_attr_str(attrs)?);
    }
    opts.merge(PageOptions {
        charset: cli.charset.clone(),
        lineend: cli.lineend.as_deref().map(str::parse::<LineEnd>).transpose()?,
        tab: cli.tab.clone(),
        doctype: cli.doctype.clone(),
        language: cli.lang.clone(),
        cache: cli.cache.then_some(true),
    });
    Ok(opts)
}

fn build(cli: &Cli) -> anyhow::Result<Page> {
    let opts = options(cli)?;
    debug!("page options: {:?}", opts);
    let mut page = Page::with_options(&opts)?;

    if let Some(title) = &cli.title {
        page.set_title(title);
    }
    for pair in &cli.meta {
        let (name, content) = split_pair(pair, "meta")?;
        page.set_meta_data(name, content, false);
    }
    for pair in &cli.http_equiv {
        let (name, content) = split_pair(pair, "http-equiv")?;
        page.set_meta_data(name, content, true);
    }
    if let Some(pair) = &cli.refresh {
        let (seconds, url) = split_pair(pair, "refresh")?;
        let seconds = seconds
            .parse::<u32>()
            .with_context(|| format!("invalid refresh delay \"{}\"", seconds))?;
        page.set_meta_refresh(seconds, RefreshTarget::Url(url.to_string()))?;
    }
    for url in &cli.stylesheet {
        page.add_style_sheet(url);
    }
    for url in &cli.script {
        page.add_script(url);
    }
    if let Some(path) = &cli.style_file {
        let css = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        page.add_style_declaration(StyleContent::Text(css.trim_end().to_string()));
    }
    if let Some(attrs) = &cli.body_attrs {
        page.set_body_attributes(attrs.parse::<Attributes>()?);
    }
    for path in &cli.body_file {
        let content =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        page.add_body_content(content.trim_end().to_string());
    }
    for line in &cli.body {
        page.add_body_content(line.as_str());
    }
    Ok(page)
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let page = build(cli)?;
    let mut out: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(
            fs::File::create(path).with_context(|| format!("creating {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    if cli.send {
        page.send(&mut out)?;
    } else {
        let html = page.render()?;
        out.write_all(html.as_bytes())?;
        out.write_all(page.line_end().as_str().as_bytes())?;
        out.flush()?;
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("htmlpage: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
