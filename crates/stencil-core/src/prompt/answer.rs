//! Values produced by widgets

use serde_json::Value;

/// Delimiter of the canonical string form of a multi-pick result
pub const SELECTION_DELIMITER: &str = ";";

/// One picked list entry
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionItem {
    /// Position of the item in the list, separators included
    pub index: usize,
    pub label: String,
    pub payload: Option<Value>,
}

impl SelectionItem {
    /// Payload when present, label otherwise
    pub fn payload_or_label(&self) -> Value {
        match &self.payload {
            Some(payload) if !payload.is_null() => payload.clone(),
            _ => Value::String(self.label.clone()),
        }
    }

    /// Payload if it is a string, label otherwise
    pub fn canonical(&self) -> String {
        match &self.payload {
            Some(Value::String(s)) => s.clone(),
            _ => self.label.clone(),
        }
    }
}

/// Result of a pick widget
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Single(Option<SelectionItem>),
    Multi(Vec<SelectionItem>),
}

impl Selection {
    pub fn items(&self) -> &[SelectionItem] {
        match self {
            Selection::Single(Some(item)) => std::slice::from_ref(item),
            Selection::Single(None) => &[],
            Selection::Multi(items) => items,
        }
    }

    /// Canonical string form substituted into downstream expressions
    pub fn canonical(&self) -> String {
        self.items()
            .iter()
            .map(SelectionItem::canonical)
            .collect::<Vec<_>>()
            .join(SELECTION_DELIMITER)
    }

    /// Value stored in an answer set
    pub fn normalized(&self) -> Value {
        match self {
            Selection::Single(Some(item)) => item.payload_or_label(),
            Selection::Single(None) => Value::String(String::new()),
            Selection::Multi(_) => Value::String(self.canonical()),
        }
    }
}

/// Value committed by a widget
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerValue {
    Text(String),
    Bool(bool),
    Selection(Selection),
}

impl AnswerValue {
    pub fn normalized(&self) -> Value {
        match self {
            AnswerValue::Text(s) => Value::String(s.clone()),
            AnswerValue::Bool(b) => Value::Bool(*b),
            AnswerValue::Selection(s) => s.normalized(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AnswerValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AnswerValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The picked item of a single-pick result
    pub fn as_single(&self) -> Option<&SelectionItem> {
        match self {
            AnswerValue::Selection(Selection::Single(item)) => item.as_ref(),
            _ => None,
        }
    }

    /// Short text shown after the question once the widget completes
    pub fn display(&self) -> String {
        match self {
            AnswerValue::Text(s) => s.clone(),
            AnswerValue::Bool(true) => "Yes".to_string(),
            AnswerValue::Bool(false) => "No".to_string(),
            AnswerValue::Selection(s) => s.canonical(),
        }
    }
}
