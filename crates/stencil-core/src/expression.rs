//! Expression evaluation for conditions, item lists, output names and file contents
//!
//! Expressions use Handlebars syntax. Besides the built-in helpers (`eq`,
//! `and`, `not`, `gt`, ...) the evaluator registers an explicit, enumerated
//! capability table:
//!
//! - `env NAME` - read an environment variable (empty when unset)
//! - `parse_float VALUE` - lenient float conversion for numeric comparisons
//! - `upper` / `lower` - case conversion
//!
//! Only `env` and `parse_float` go through [`Capabilities`], so tests can
//! swap them for a fixed table.

use crate::answers::{to_f64, truthy};
use handlebars::{
    handlebars_helper, no_escape, Context, Handlebars, Helper, HelperDef, RenderContext,
    RenderErrorReason, ScopedJson,
};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Syntax or evaluation failure of a single expression
#[derive(Debug, Clone, Error)]
#[error("failed to evaluate '{name}': {message}")]
pub struct ExpressionError {
    /// Where the expression came from (step id, rule input, file path)
    pub name: String,
    pub message: String,
}

/// Side-effecting functions reachable from template expressions
pub trait Capabilities: Send + Sync {
    /// Look up an environment variable
    fn env_var(&self, name: &str) -> Option<String>;

    /// Convert a value to a float, `0.0` when it cannot be parsed
    fn parse_float(&self, value: &Value) -> f64 {
        to_f64(value, 0.0)
    }
}

/// Capabilities backed by the running process
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCapabilities;

impl Capabilities for SystemCapabilities {
    fn env_var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Fixed capability table, handy for tests and reproducible renders
#[derive(Debug, Clone, Default)]
pub struct FixedCapabilities {
    pub vars: HashMap<String, String>,
}

impl FixedCapabilities {
    pub fn with_var(mut self, name: &str, value: &str) -> Self {
        self.vars.insert(name.to_string(), value.to_string());
        self
    }
}

impl Capabilities for FixedCapabilities {
    fn env_var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

struct EnvHelper(Arc<dyn Capabilities>);

impl HelperDef for EnvHelper {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'rc>, handlebars::RenderError> {
        let name = h
            .param(0)
            .and_then(|p| p.value().as_str())
            .ok_or_else(|| RenderErrorReason::Other("env: expected a variable name".into()))?;

        let value = self.0.env_var(name).unwrap_or_default();
        Ok(ScopedJson::Derived(Value::String(value)))
    }
}

struct ParseFloatHelper(Arc<dyn Capabilities>);

impl HelperDef for ParseFloatHelper {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'rc>, handlebars::RenderError> {
        let param = h
            .param(0)
            .ok_or_else(|| RenderErrorReason::Other("parse_float: expected a value".into()))?;

        let number = self.0.parse_float(param.value());
        let json = serde_json::Number::from_f64(number).map_or(Value::Null, Value::Number);
        Ok(ScopedJson::Derived(json))
    }
}

handlebars_helper!(upper: |s: str| s.to_uppercase());
handlebars_helper!(lower: |s: str| s.to_lowercase());

/// Renders expressions against an answer set
pub struct Evaluator {
    registry: Handlebars<'static>,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    /// Evaluator wired to the real process environment
    pub fn new() -> Self {
        Self::with_capabilities(Arc::new(SystemCapabilities))
    }

    pub fn with_capabilities(capabilities: Arc<dyn Capabilities>) -> Self {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(no_escape);
        registry.register_helper("env", Box::new(EnvHelper(capabilities.clone())));
        registry.register_helper("parse_float", Box::new(ParseFloatHelper(capabilities)));
        registry.register_helper("upper", Box::new(upper));
        registry.register_helper("lower", Box::new(lower));

        Self { registry }
    }

    /// Render `expression` to a string
    ///
    /// `name` only identifies the expression in error messages.
    pub fn render<T: Serialize>(
        &self,
        name: &str,
        expression: &str,
        data: &T,
    ) -> Result<String, ExpressionError> {
        self.registry
            .render_template(expression, data)
            .map_err(|e| ExpressionError {
                name: name.to_string(),
                message: e.to_string(),
            })
    }

    /// Render `expression` and coerce the output to a boolean
    ///
    /// An empty or whitespace-only expression yields `default_if_empty`
    /// without being evaluated.
    pub fn render_bool<T: Serialize>(
        &self,
        name: &str,
        expression: &str,
        data: &T,
        default_if_empty: bool,
    ) -> Result<bool, ExpressionError> {
        let expression = expression.trim();
        if expression.is_empty() {
            return Ok(default_if_empty);
        }

        let rendered = self.render(name, expression, data)?;
        Ok(truthy(&Value::String(rendered), default_if_empty))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answers::AnswerSet;
    use serde_json::json;

    fn answers() -> AnswerSet {
        let mut all = AnswerSet::new();
        all.insert("name".into(), json!("demo"));
        all.insert("useForm".into(), json!(true));
        all.insert("qtVersion".into(), json!("6.5"));
        all.insert("uiUsage".into(), json!("pointer"));
        all
    }

    fn evaluator() -> Evaluator {
        let caps = FixedCapabilities::default().with_var("STENCIL_AUTHOR", "Ada");
        Evaluator::with_capabilities(Arc::new(caps))
    }

    #[test]
    fn test_render_substitutes_answers() {
        let out = evaluator()
            .render("t", "{{name}}.cpp", &answers())
            .unwrap();
        assert_eq!(out, "demo.cpp");
    }

    #[test]
    fn test_render_does_not_escape_html() {
        let mut data = answers();
        data.insert("include".into(), json!("<QWidget>"));
        let out = evaluator().render("t", "#include {{include}}", &data).unwrap();
        assert_eq!(out, "#include <QWidget>");
    }

    #[test]
    fn test_render_bool_empty_uses_default() {
        let e = evaluator();
        assert!(e.render_bool("t", "   ", &answers(), true).unwrap());
        assert!(!e.render_bool("t", "", &answers(), false).unwrap());
    }

    #[test]
    fn test_render_bool_coerces_output() {
        let e = evaluator();
        assert!(e.render_bool("t", "{{useForm}}", &answers(), false).unwrap());
        assert!(e
            .render_bool("t", "{{eq uiUsage \"pointer\"}}", &answers(), false)
            .unwrap());
        assert!(!e.render_bool("t", "{{missing}}", &answers(), true).unwrap());
        assert!(!e.render_bool("t", "maybe", &answers(), true).unwrap());
    }

    #[test]
    fn test_env_helper_uses_injected_table() {
        let e = evaluator();
        assert_eq!(
            e.render("t", "{{env \"STENCIL_AUTHOR\"}}", &answers()).unwrap(),
            "Ada"
        );
        assert_eq!(e.render("t", "{{env \"UNSET_VAR\"}}", &answers()).unwrap(), "");
    }

    #[test]
    fn test_parse_float_supports_comparisons() {
        let e = evaluator();
        assert!(e
            .render_bool("t", "{{gt (parse_float qtVersion) 6.4}}", &answers(), false)
            .unwrap());
        assert!(!e
            .render_bool("t", "{{lt (parse_float qtVersion) 6.0}}", &answers(), true)
            .unwrap());
    }

    #[test]
    fn test_case_helpers() {
        let out = evaluator()
            .render("t", "{{upper name}}_H", &answers())
            .unwrap();
        assert_eq!(out, "DEMO_H");
    }

    #[test]
    fn test_syntax_error_is_reported() {
        let err = evaluator()
            .render("steps:broken", "{{#if useForm}}no end", &answers())
            .unwrap_err();
        assert_eq!(err.name, "steps:broken");
    }

    #[test]
    fn test_helper_misuse_is_reported() {
        let result = evaluator().render("t", "{{env useForm}}", &answers());
        assert!(result.is_err());
    }
}
