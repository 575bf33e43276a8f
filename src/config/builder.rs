//! Accumulates [`ConfigAssignment`]s into a JSON object.

use serde_json::{Map, Value};
use tracing::trace;

use super::parse::{ConfigAssignment, ConfigOp};

/// The folded configuration object.
pub type Config = Map<String, Value>;

/// Keys ending in `s` (`plugins`, `outputs`, `paths`) are list-typed.
fn is_plural(key: &str) -> bool {
    key.ends_with('s')
}

/// Walk to the object holding the last path segment, replacing any
/// non-object on the way with `{}`.
fn parent_mut<'a>(root: &'a mut Config, path: &[String]) -> Option<&'a mut Config> {
    let mut current = root;
    for key in path {
        let slot = current.entry(key.as_str()).or_insert(Value::Null);
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        current = slot.as_object_mut()?;
    }
    Some(current)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn into_config(self) -> Config {
        self.config
    }

    /// Value at a dotted path such as `bibliography.style`.
    pub fn get(&self, path: &str) -> Option<&Value> {
        lookup(&self.config, path)
    }

    pub fn apply(&mut self, assignment: &ConfigAssignment) {
        let Some((key, parents)) = assignment.path.split_last() else {
            return;
        };
        let Some(parent) = parent_mut(&mut self.config, parents) else {
            return;
        };
        trace!(path = %assignment.path.join("."), op = %assignment.op, "config assignment");

        let value = assignment.value.clone();
        match assignment.op {
            ConfigOp::Set => {
                parent.insert(key.clone(), value.unwrap_or(Value::Null));
            }
            ConfigOp::Append => {
                let slot = parent.entry(key.as_str()).or_insert(Value::Null);
                if !slot.is_array() {
                    let previous = slot.take();
                    let items = if is_plural(key) || previous.is_null() {
                        Vec::new()
                    } else {
                        vec![previous]
                    };
                    *slot = Value::Array(items);
                }
                if let Value::Array(items) = slot {
                    items.push(value.unwrap_or(Value::Null));
                }
            }
            ConfigOp::Remove => {
                if let (Some(Value::Array(items)), Some(value)) = (parent.get_mut(key), value) {
                    items.retain(|item| *item != value);
                }
            }
            ConfigOp::Reset => {
                if is_plural(key) {
                    parent.insert(key.clone(), Value::Array(value.into_iter().collect()));
                } else {
                    match value {
                        Some(value) => {
                            parent.insert(key.clone(), value);
                        }
                        None => {
                            parent.remove(key);
                        }
                    }
                }
            }
        }
    }

    pub fn apply_many<'a>(&mut self, assignments: impl IntoIterator<Item = &'a ConfigAssignment>) {
        for assignment in assignments {
            self.apply(assignment);
        }
    }
}

impl From<Config> for ConfigBuilder {
    /// Continue accumulating on top of an already folded config.
    fn from(config: Config) -> Self {
        Self { config }
    }
}

/// Value at a dotted path in a folded config.
pub fn lookup<'a>(config: &'a Config, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.').filter(|s| !s.is_empty());
    let mut current = config.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}
