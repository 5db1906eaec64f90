use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

pub mod loader;

/// A prompt template definition loaded from a JSON file.
#[derive(Debug, Clone, Deserialize)]
pub struct PromptDef {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub parameters: BTreeMap<String, ParamDef>,
    pub template: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    #[default]
    String,
    Number,
    Boolean,
}

impl ParamKind {
    fn matches(self, value: &Value) -> bool {
        // Null reads as "not supplied" and falls back to defaults.
        if value.is_null() {
            return true;
        }
        match self {
            ParamKind::String => value.is_string(),
            ParamKind::Number => value.is_number(),
            ParamKind::Boolean => value.is_boolean(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParamDef {
    #[serde(rename = "type", default)]
    pub kind: ParamKind,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub default: Option<Value>,
}

/// Name -> template mapping. Later inserts win, which is how the private
/// prompt directory overrides the public one.
#[derive(Debug, Default)]
pub struct PromptRegistry {
    prompts: BTreeMap<String, PromptDef>,
}

impl PromptRegistry {
    pub fn insert(&mut self, def: PromptDef) {
        self.prompts.insert(def.name.clone(), def);
    }

    pub fn lookup(&self, name: &str) -> Option<&PromptDef> {
        self.prompts.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PromptDef> {
        self.prompts.values()
    }

    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }
}

pub type SharedRegistry = Arc<RwLock<PromptRegistry>>;

// Matches {{name}} and {{name || "literal default"}}.
static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\{\{([^}|]+)(?:\|\|\s*"([^"]+)")?\}\}"#).expect("placeholder regex")
});

/// Substitute placeholders in a template. A missing or null argument falls
/// back to the placeholder's literal default, or the empty string.
pub fn render_template(template: &str, args: &Map<String, Value>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            let name = caps[1].trim();
            match args.get(name) {
                Some(Value::String(text)) => text.clone(),
                Some(Value::Null) | None => caps
                    .get(2)
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default(),
                Some(other) => other.to_string(),
            }
        })
        .into_owned()
}

/// Render a prompt definition with caller arguments, applying declared
/// parameter defaults for anything the caller left out.
pub fn render(def: &PromptDef, args: &Map<String, Value>) -> String {
    let mut merged = args.clone();
    for (name, param) in &def.parameters {
        if !merged.contains_key(name)
            && let Some(default) = &param.default
        {
            merged.insert(name.clone(), default.clone());
        }
    }
    render_template(&def.template, &merged)
}

/// Names of required parameters the caller did not supply (and that have
/// no declared default).
pub fn missing_required<'a>(def: &'a PromptDef, args: &Map<String, Value>) -> Vec<&'a str> {
    def.parameters
        .iter()
        .filter(|(name, param)| {
            param.required && param.default.is_none() && !args.contains_key(*name)
        })
        .map(|(name, _)| name.as_str())
        .collect()
}

/// Names of supplied arguments whose JSON type does not match the declared
/// parameter type.
pub fn mismatched_arguments<'a>(def: &'a PromptDef, args: &Map<String, Value>) -> Vec<&'a str> {
    def.parameters
        .iter()
        .filter(|(name, param)| {
            args.get(*name)
                .is_some_and(|value| !param.kind.matches(value))
        })
        .map(|(name, _)| name.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().expect("object").clone()
    }

    #[test]
    fn literal_default_used_when_argument_missing() {
        let rendered = render_template(r#"Hello {{name || "World"}}"#, &Map::new());
        assert_eq!(rendered, "Hello World");
    }

    #[test]
    fn argument_overrides_literal_default() {
        let rendered = render_template(
            r#"Hello {{name || "World"}}"#,
            &args(json!({"name": "Ann"})),
        );
        assert_eq!(rendered, "Hello Ann");
    }

    #[test]
    fn missing_argument_without_default_renders_empty() {
        let rendered = render_template("Hello {{name}}!", &Map::new());
        assert_eq!(rendered, "Hello !");
    }

    #[test]
    fn non_string_arguments_are_stringified() {
        let rendered = render_template(
            "{{count}} slides, notes: {{notes}}",
            &args(json!({"count": 12, "notes": true})),
        );
        assert_eq!(rendered, "12 slides, notes: true");
    }

    #[test]
    fn declared_defaults_apply_before_rendering() {
        let def: PromptDef = serde_json::from_value(json!({
            "name": "briefing",
            "description": "test",
            "parameters": {
                "topic": {"type": "string", "required": true},
                "urgency": {"type": "string", "default": "important"}
            },
            "template": "Brief on {{topic}} with {{urgency}} priority"
        }))
        .expect("def");

        let rendered = render(&def, &args(json!({"topic": "security"})));
        assert_eq!(rendered, "Brief on security with important priority");
    }

    #[test]
    fn required_parameters_reported_when_absent() {
        let def: PromptDef = serde_json::from_value(json!({
            "name": "briefing",
            "description": "test",
            "parameters": {
                "topic": {"type": "string", "required": true},
                "urgency": {"type": "string", "required": false}
            },
            "template": "{{topic}}"
        }))
        .expect("def");

        assert_eq!(missing_required(&def, &Map::new()), vec!["topic"]);
        assert!(missing_required(&def, &args(json!({"topic": "x"}))).is_empty());
    }

    #[test]
    fn argument_type_mismatches_are_reported() {
        let def: PromptDef = serde_json::from_value(json!({
            "name": "sizing",
            "description": "test",
            "parameters": {
                "count": {"type": "number", "required": true},
                "label": {"type": "string"}
            },
            "template": "{{count}} {{label}}"
        }))
        .expect("def");

        assert_eq!(
            mismatched_arguments(&def, &args(json!({"count": "twelve"}))),
            vec!["count"]
        );
        assert!(mismatched_arguments(&def, &args(json!({"count": 12}))).is_empty());
        assert!(mismatched_arguments(&def, &args(json!({"label": null}))).is_empty());
    }

    #[test]
    fn whitespace_inside_placeholder_is_tolerated() {
        let rendered = render_template("Hi {{ name }}", &args(json!({"name": "Bo"})));
        assert_eq!(rendered, "Hi Bo");
    }
}
