//! Typed view of the engine-level keys of a folded config.

use serde::Serialize;
use serde_json::Value;

use super::builder::Config;

/// A requested output file, from `outputs+=[type=...,path=...]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputSpec {
    /// Output format, e.g. `json` or `html`.
    pub kind: String,
    /// Output path, relative to the entry file's directory unless absolute.
    pub path: String,
    /// Restrict the output to one plugin.
    pub plugin: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EngineConfig {
    pub plugins: Vec<String>,
    pub outputs: Vec<OutputSpec>,
}

impl EngineConfig {
    pub fn from_config(config: &Config) -> Self {
        let plugins = list(config.get("plugins"))
            .filter_map(scalar_string)
            .filter(|name| !name.is_empty())
            .collect();
        let outputs = list(config.get("outputs"))
            .filter_map(OutputSpec::from_value)
            .collect();
        Self { plugins, outputs }
    }

    /// Outputs of `kind` meant for `plugin` (or for any plugin).
    pub fn outputs_for<'a>(&'a self, kind: &'a str, plugin: &'a str) -> impl Iterator<Item = &'a OutputSpec> {
        self.outputs.iter().filter(move |output| {
            output.kind == kind && output.plugin.as_deref().is_none_or(|p| p == plugin)
        })
    }
}

impl OutputSpec {
    fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        Some(Self {
            kind: object.get("type").and_then(scalar_string)?,
            path: object.get("path").and_then(scalar_string)?,
            plugin: object.get("plugin").and_then(scalar_string),
        })
    }
}

/// A list value as its items; a lone scalar counts as one item.
fn list(value: Option<&Value>) -> impl Iterator<Item = &Value> {
    let items: &[Value] = match value {
        Some(Value::Array(items)) => items,
        Some(Value::Null) | None => &[],
        Some(other) => std::slice::from_ref(other),
    };
    items.iter()
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config(value: Value) -> Config {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_engine_config_from_folded_values() {
        let engine = EngineConfig::from_config(&config(json!({
            "plugins": ["docgen", "ir-json", 3, null],
            "outputs": [
                {"type": "json", "path": "out/doc.json"},
                {"type": "html"},
                {"type": "json", "path": "only.json", "plugin": "ir-json"},
                "garbage"
            ]
        })));

        assert_eq!(engine.plugins, vec!["docgen", "ir-json", "3"]);
        assert_eq!(engine.outputs.len(), 2);
        assert_eq!(engine.outputs[0].path, "out/doc.json");
        assert_eq!(engine.outputs[1].plugin.as_deref(), Some("ir-json"));
    }

    #[test]
    fn test_scalar_plugins_value() {
        let engine = EngineConfig::from_config(&config(json!({"plugins": "docgen"})));
        assert_eq!(engine.plugins, vec!["docgen"]);
        assert!(engine.outputs.is_empty());
    }

    #[test]
    fn test_outputs_for_filters_by_kind_and_plugin() {
        let engine = EngineConfig::from_config(&config(json!({
            "outputs": [
                {"type": "json", "path": "a.json"},
                {"type": "json", "path": "b.json", "plugin": "other"},
                {"type": "html", "path": "c.html"}
            ]
        })));

        let paths: Vec<_> = engine
            .outputs_for("json", "ir-json")
            .map(|o| o.path.as_str())
            .collect();
        assert_eq!(paths, vec!["a.json"]);
    }
}
