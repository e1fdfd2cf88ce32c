//! Scopes command - List the scopes a template declares

use clap::{Args, ValueEnum};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tessera_armature::parse_with_options;
use tessera_atelier::discovery::{collect_bindings, scope_name, scope_roots};
use tessera_atelier::BindingOptions;
use tessera_relief::{Document, NodeId};

use crate::config::load_config;

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    /// One line per scope
    #[default]
    Text,
    /// JSON array of scope summaries
    Json,
}

#[derive(Args)]
pub struct ScopesArgs {
    /// Template file
    pub template: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// One scope name found in a template
#[derive(Debug, Serialize, PartialEq)]
pub(crate) struct ScopeSummary {
    pub name: String,
    /// Number of sibling instances of this scope
    pub count: usize,
    pub bindings: Vec<String>,
    /// Scopes nested inside the first instance
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub scopes: Vec<ScopeSummary>,
}

pub fn run(args: ScopesArgs) {
    let config = load_config(args.config.as_deref());

    let source = match fs::read_to_string(&args.template) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Failed to read {}: {}", args.template.display(), e);
            std::process::exit(1);
        }
    };

    let (doc, errors) = parse_with_options(&source, config.parser_options());
    for error in &errors {
        tracing::warn!("{}: {}", args.template.display(), error);
    }

    let summaries = summarize(&doc, doc.root(), &config.binding_options());
    match args.format {
        OutputFormat::Text => print!("{}", render_text(&summaries)),
        OutputFormat::Json => match serde_json::to_string_pretty(&summaries) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to serialize scopes: {}", e);
                std::process::exit(1);
            }
        },
    }
}

/// Summaries of the outermost scopes under `from`, grouped by name in
/// first-seen order
pub(crate) fn summarize(
    doc: &Document,
    from: NodeId,
    options: &BindingOptions,
) -> Vec<ScopeSummary> {
    let mut summaries: Vec<ScopeSummary> = Vec::new();
    for id in scope_roots(doc, from, options) {
        let Some(name) = scope_name(doc, id, options) else {
            continue;
        };
        match summaries.iter_mut().find(|s| s.name == name) {
            Some(summary) => summary.count += 1,
            None => summaries.push(ScopeSummary {
                name: name.to_string(),
                count: 1,
                bindings: collect_bindings(doc, id, options),
                scopes: summarize(doc, id, options),
            }),
        }
    }
    summaries
}

fn render_text(summaries: &[ScopeSummary]) -> String {
    let mut out = String::new();
    write_text(&mut out, summaries, 0);
    out
}

fn write_text(out: &mut String, summaries: &[ScopeSummary], depth: usize) {
    for summary in summaries {
        out.push_str(&"  ".repeat(depth));
        out.push_str(&format!("{} ({})", summary.name, summary.count));
        if !summary.bindings.is_empty() {
            out.push_str(": ");
            out.push_str(&summary.bindings.join(", "));
        }
        out.push('\n');
        write_text(out, &summary.scopes, depth + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_armature::parse;

    const TEMPLATE: &str = concat!(
        r#"<div data-scope="post"><h1 data-prop="title"></h1>"#,
        r#"<p data-scope="comment"><span data-prop="body"></span><i data-prop="author"></i></p>"#,
        r#"</div>"#,
        r#"<div data-scope="post"><h1 data-prop="title"></h1></div>"#,
        r#"<footer data-scope="site"></footer>"#,
    );

    #[test]
    fn test_summarize_groups_by_name() {
        let (doc, _) = parse(TEMPLATE);
        let summaries = summarize(&doc, doc.root(), &BindingOptions::default());
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].name, "post");
        assert_eq!(summaries[0].count, 2);
        assert_eq!(summaries[0].bindings, vec!["title"]);
        assert_eq!(summaries[0].scopes[0].bindings, vec!["body", "author"]);
        assert_eq!(summaries[1].name, "site");
    }

    #[test]
    fn test_render_text() {
        let (doc, _) = parse(TEMPLATE);
        let summaries = summarize(&doc, doc.root(), &BindingOptions::default());
        insta::assert_snapshot!(render_text(&summaries), @r"
        post (2): title
          comment (1): body, author
        site (1)
        ");
    }

    #[test]
    fn test_json_skips_empty_nesting() {
        let (doc, _) = parse(r#"<li data-scope="item"><b data-prop="name"></b></li>"#);
        let summaries = summarize(&doc, doc.root(), &BindingOptions::default());
        assert_eq!(
            serde_json::to_string(&summaries).unwrap(),
            r#"[{"name":"item","count":1,"bindings":["name"]}]"#
        );
    }
}
