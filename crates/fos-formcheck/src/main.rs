//! fos-formcheck - validate a page's first form
//!
//! Usage: `fos-formcheck <file.html> [--messages table.json] [--focus]`
//!
//! Prints one line per field and exits with status 1 if the form is invalid.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, bail};
use fos_dom::{Document, NodeId};
use fos_forms::{FormValidityObserver, MessageTable, ValidateOptions, ValidatorOptions};
use tracing_subscriber::EnvFilter;

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

struct Args {
    page: PathBuf,
    messages: Option<PathBuf>,
    focus: bool,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> anyhow::Result<Args> {
    let mut page = None;
    let mut messages = None;
    let mut focus = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--messages" => {
                let path = args.next().context("--messages needs a file")?;
                messages = Some(PathBuf::from(path));
            }
            "--focus" => focus = true,
            flag if flag.starts_with("--") => bail!("unknown option {flag}"),
            _ if page.is_none() => page = Some(PathBuf::from(arg)),
            _ => bail!("unexpected argument {arg}"),
        }
    }

    Ok(Args {
        page: page.context("usage: fos-formcheck <file.html> [--messages table.json] [--focus]")?,
        messages,
        focus,
    })
}

fn first_form(doc: &Document) -> Option<NodeId> {
    doc.tree_order().into_iter().find(|&node| doc.is_element(node, "form"))
}

fn run(args: Args) -> anyhow::Result<bool> {
    let html = std::fs::read_to_string(&args.page)
        .with_context(|| format!("reading {}", args.page.display()))?;
    let url = format!("file://{}", args.page.display());
    let doc = fos_html::HtmlParser::new()
        .parse_with_url(&html, &url)
        .context("parsing page")?;
    let form = first_form(&doc).context("page has no <form>")?;
    tracing::debug!(?form, page = %args.page.display(), "observing first form");
    let doc = doc.into_shared();

    let table = match &args.messages {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            MessageTable::from_json(&json).with_context(|| format!("loading {}", path.display()))?
        }
        None => MessageTable::default(),
    };

    let options = ValidatorOptions::new().default_errors(table.defaults());
    let observer = FormValidityObserver::new(doc.clone(), options);
    observer.observe(form)?;
    table.apply(&observer);

    let validation = observer.validate_fields(None, ValidateOptions { focus: args.focus })?;
    let valid = smol::block_on(validation.settle());

    let doc = doc.borrow();
    for field in doc.listed_elements(form) {
        let Some(name) = doc.field_name(field) else {
            continue;
        };
        let anchor = match fos_forms::resolve_target(&doc, form, name) {
            Some(target) if target.control() == field => target.anchor(),
            _ => continue,
        };
        let state = match doc.get_attribute(anchor, "aria-invalid") {
            Some("true") => "invalid",
            _ => "ok",
        };
        let message = doc.validation_message(field);
        if message.is_empty() {
            println!("{name:<24} {state}");
        } else {
            println!("{name:<24} {state:<8} {message}");
        }
    }
    if let Some(focused) = doc.active_element().and_then(|node| doc.field_name(node)) {
        println!("focus -> {focused}");
    }
    Ok(valid)
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args(std::env::args().skip(1))?;
    let valid = run(args)?;
    Ok(if valid { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> anyhow::Result<Args> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_args() {
        let parsed = args(&["page.html", "--messages", "m.json", "--focus"]).unwrap();
        assert_eq!(parsed.page, PathBuf::from("page.html"));
        assert_eq!(parsed.messages, Some(PathBuf::from("m.json")));
        assert!(parsed.focus);
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(args(&[]).is_err());
        assert!(args(&["page.html", "--messages"]).is_err());
        assert!(args(&["page.html", "--verbose"]).is_err());
        assert!(args(&["a.html", "b.html"]).is_err());
    }

    #[test]
    fn test_first_form() {
        let doc = fos_html::parse(r#"<div></div><form id="one"></form><form id="two"></form>"#).unwrap();
        assert_eq!(first_form(&doc), doc.get_element_by_id("one"));
    }

    #[test]
    fn test_run_reports_invalid_form() {
        let dir = std::env::temp_dir().join(format!("fos-formcheck-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let page = dir.join("page.html");
        let messages = dir.join("messages.json");
        std::fs::write(&page, r#"<form><input name="email" type="email" value="bad"></form>"#).unwrap();
        std::fs::write(&messages, r#"{ "email": { "type": "Bad format" } }"#).unwrap();

        let valid = run(Args { page: page.clone(), messages: Some(messages), focus: true }).unwrap();
        assert!(!valid);

        std::fs::write(&page, r#"<form><input name="email" type="email" value="a@b.co"></form>"#).unwrap();
        assert!(run(Args { page, messages: None, focus: false }).unwrap());
        std::fs::remove_dir_all(&dir).ok();
    }
}
