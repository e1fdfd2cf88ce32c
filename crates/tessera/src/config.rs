//! Configuration file loading for tessera.
//!
//! Reads `tessera.config.json` from the current working directory, or the
//! file given with `--config`. Also provides the JSON Schema for editor
//! autocompletion.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tessera_atelier::BindingOptions;
use tessera_relief::{ParserOptions, WhitespaceStrategy};

/// Default config file name, looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "tessera.config.json";

/// Top-level tessera configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct TesseraConfig {
    /// JSON Schema reference (for editor autocompletion).
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Marker attribute names.
    #[serde(default)]
    pub attributes: AttributesConfig,

    /// Template parsing configuration.
    #[serde(default)]
    pub parser: ParserConfig,
}

/// Names of the attributes that mark scopes and props.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct AttributesConfig {
    /// Scope attribute (default: `data-scope`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    /// Prop attribute (default: `data-prop`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prop: Option<String>,
}

/// Configuration for the template parser.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ParserConfig {
    /// Drop indentation-only text between elements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condense: Option<bool>,
}

impl TesseraConfig {
    pub fn binding_options(&self) -> BindingOptions {
        let mut options = BindingOptions::default();
        if let Some(scope) = &self.attributes.scope {
            options.scope_attribute = scope.as_str().into();
        }
        if let Some(prop) = &self.attributes.prop {
            options.prop_attribute = prop.as_str().into();
        }
        options
    }

    pub fn parser_options(&self) -> ParserOptions {
        let whitespace = if self.parser.condense.unwrap_or(false) {
            WhitespaceStrategy::Condense
        } else {
            WhitespaceStrategy::Preserve
        };
        ParserOptions {
            whitespace,
            ..ParserOptions::default()
        }
    }
}

/// Load the config from `path`, or `tessera.config.json` in the CWD if None.
///
/// A missing default file is not an error. Unreadable or invalid files print
/// a warning and fall back to the defaults.
pub fn load_config(path: Option<&Path>) -> TesseraConfig {
    let config_path = match path {
        Some(path) => path.to_path_buf(),
        None => {
            let base = std::env::current_dir().unwrap_or_default();
            let default_path = base.join(CONFIG_FILE_NAME);
            if !default_path.exists() {
                return TesseraConfig::default();
            }
            default_path
        }
    };

    match std::fs::read_to_string(&config_path) {
        Ok(content) => match parse_config(&content) {
            Ok(config) => {
                tracing::debug!("loaded config from {}", config_path.display());
                config
            }
            Err(e) => {
                eprintln!(
                    "\x1b[33mWarning:\x1b[0m Failed to parse {}: {}",
                    config_path.display(),
                    e
                );
                TesseraConfig::default()
            }
        },
        Err(e) => {
            eprintln!(
                "\x1b[33mWarning:\x1b[0m Failed to read {}: {}",
                config_path.display(),
                e
            );
            TesseraConfig::default()
        }
    }
}

fn parse_config(content: &str) -> serde_json::Result<TesseraConfig> {
    serde_json::from_str(content)
}

/// JSON Schema for `tessera.config.json`.
pub const TESSERA_CONFIG_SCHEMA: &str = r#"{
  "$schema": "http://json-schema.org/draft-07/schema#",
  "title": "Tessera Configuration",
  "description": "Configuration file for tessera - declarative data binding for HTML templates",
  "type": "object",
  "properties": {
    "$schema": {
      "type": "string",
      "description": "JSON Schema reference for editor autocompletion"
    },
    "attributes": {
      "type": "object",
      "description": "Names of the attributes that mark scopes and props",
      "properties": {
        "scope": {
          "type": "string",
          "description": "Attribute marking a repeatable record; its value is the scope name",
          "default": "data-scope"
        },
        "prop": {
          "type": "string",
          "description": "Attribute marking a bindable field; its value is the prop name",
          "default": "data-prop"
        }
      },
      "additionalProperties": false
    },
    "parser": {
      "type": "object",
      "description": "Template parsing configuration",
      "properties": {
        "condense": {
          "type": "boolean",
          "description": "Drop indentation-only text between elements",
          "default": false
        }
      },
      "additionalProperties": false
    }
  },
  "additionalProperties": false
}"#;
