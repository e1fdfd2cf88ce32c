//! Bind command - Apply JSON data to a template

use clap::{Args, ValueEnum};
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tessera_armature::parse_with_options;
use tessera_atelier::View;

use crate::config::{load_config, TesseraConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum BindMode {
    /// Reshape the scope to the data, then bind each instance
    #[default]
    Apply,
    /// Bind existing instances without reshaping
    Bind,
    /// Only reshape the scope to the data
    Match,
}

#[derive(Args)]
pub struct BindArgs {
    /// Template file
    pub template: PathBuf,

    /// JSON data file
    #[arg(short, long)]
    pub data: PathBuf,

    /// Scope to bind (default: the whole document)
    #[arg(short, long)]
    pub scope: Option<String>,

    /// Binding mode
    #[arg(short, long, value_enum, default_value = "apply")]
    pub mode: BindMode,

    /// Write the result to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

pub fn run(args: BindArgs) {
    let config = load_config(args.config.as_deref());

    let html = match process(&args, &config) {
        Ok(html) => html,
        Err(err) => {
            eprintln!("Error binding {}: {}", args.template.display(), err);
            std::process::exit(1);
        }
    };

    match &args.output {
        Some(path) => {
            if let Err(e) = fs::write(path, &html) {
                eprintln!("Failed to write {}: {}", path.display(), e);
                std::process::exit(1);
            }
            tracing::info!("wrote {}", path.display());
        }
        None => println!("{}", html),
    }
}

fn process(args: &BindArgs, config: &TesseraConfig) -> Result<String, String> {
    let source =
        fs::read_to_string(&args.template).map_err(|e| format!("Failed to read template: {}", e))?;
    let data = fs::read_to_string(&args.data).map_err(|e| format!("Failed to read data: {}", e))?;
    let data: Value =
        serde_json::from_str(&data).map_err(|e| format!("Failed to parse data: {}", e))?;

    render(&source, &data, args.scope.as_deref(), args.mode, config)
}

/// Parse `source`, bind `data` and serialize the result
pub(crate) fn render(
    source: &str,
    data: &Value,
    scope: Option<&str>,
    mode: BindMode,
    config: &TesseraConfig,
) -> Result<String, String> {
    let (mut doc, errors) = parse_with_options(source, config.parser_options());
    for error in &errors {
        tracing::warn!("template: {}", error);
    }

    let root = View::from_doc_with_options(&doc, config.binding_options());
    match scope {
        Some(name) => {
            let views = root.scope(&doc, name);
            if views.is_empty() {
                tracing::warn!("no scope named `{}` in template", name);
            }
            let result = match mode {
                BindMode::Apply => views.apply(&mut doc, data).map(drop),
                BindMode::Bind => views.bind(&mut doc, data),
                BindMode::Match => views.match_data(&mut doc, data).map(drop),
            };
            result.map_err(|e| e.to_string())?;
        }
        None => match mode {
            BindMode::Apply | BindMode::Bind => {
                root.bind(&mut doc, data).map_err(|e| e.to_string())?;
            }
            BindMode::Match => return Err("--mode match needs a --scope".to_string()),
        },
    }

    Ok(doc.to_html_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TEMPLATE: &str = r#"<h1 data-prop="title">?</h1><ul><li data-scope="item"><b data-prop="name">?</b></li></ul>"#;

    fn render_default(data: Value, scope: Option<&str>, mode: BindMode) -> Result<String, String> {
        render(TEMPLATE, &data, scope, mode, &TesseraConfig::default())
    }

    #[test]
    fn test_apply_scope() {
        let html = render_default(
            json!([{ "name": "a" }, { "name": "b" }]),
            Some("item"),
            BindMode::Apply,
        )
        .unwrap();
        insta::assert_snapshot!(html, @r#"<h1 data-prop="title">?</h1><ul><li data-scope="item"><b data-prop="name">a</b></li><li data-scope="item"><b data-prop="name">b</b></li></ul>"#);
    }

    #[test]
    fn test_match_scope() {
        let html = render_default(json!([]), Some("item"), BindMode::Match).unwrap();
        insta::assert_snapshot!(html, @r#"<h1 data-prop="title">?</h1><ul></ul>"#);
    }

    #[test]
    fn test_bind_root() {
        let html = render_default(json!({ "title": "List" }), None, BindMode::Bind).unwrap();
        insta::assert_snapshot!(html, @r#"<h1 data-prop="title">List</h1><ul><li data-scope="item"><b data-prop="name">?</b></li></ul>"#);
    }

    #[test]
    fn test_missing_key_is_reported() {
        let err = render_default(json!({}), None, BindMode::Apply).unwrap_err();
        assert_eq!(err, "no value for key `title`");
    }

    #[test]
    fn test_match_without_scope_fails() {
        assert!(render_default(json!([]), None, BindMode::Match).is_err());
    }

    #[test]
    fn test_unknown_scope_leaves_template() {
        let html = render_default(json!([{}]), Some("nope"), BindMode::Apply).unwrap();
        assert_eq!(html, TEMPLATE);
    }

    #[test]
    fn test_configured_attributes() {
        let config: TesseraConfig =
            serde_json::from_str(r#"{ "attributes": { "scope": "ui", "prop": "field" } }"#)
                .unwrap();
        let html = render(
            r#"<p ui="row"><i field="n"></i></p>"#,
            &json!([{ "n": 1 }, { "n": 2 }]),
            Some("row"),
            BindMode::Apply,
            &config,
        )
        .unwrap();
        insta::assert_snapshot!(html, @r#"<p ui="row"><i field="n">1</i></p><p ui="row"><i field="n">2</i></p>"#);
    }
}
