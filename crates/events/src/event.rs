use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde_json::{Map, Value, json};

use crate::error::EventsError;

/// Logged when the app comes to the foreground.
pub const ACTIVATE_APP_EVENT: &str = "fb_mobile_activate_app";

/// Longer parameter values are cut to this many characters.
pub const MAX_PARAMETER_VALUE_LEN: usize = 100;

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-zA-Z_]+[0-9a-zA-Z _-]*$").expect("identifier regex should compile")
});

/// Event names and parameter keys: 2..=40 characters of `[0-9a-zA-Z _-]`,
/// not starting with a space or a dash.
pub fn validate_identifier(identifier: &str) -> Result<(), EventsError> {
    let len = identifier.chars().count();
    if !(2..=40).contains(&len) || !IDENTIFIER.is_match(identifier) {
        return Err(EventsError::InvalidIdentifier(identifier.to_string()));
    }
    Ok(())
}

/// A single custom app event.
#[derive(Debug, Clone, PartialEq)]
pub struct AppEvent {
    pub name: String,
    pub value_to_sum: Option<f64>,
    pub parameters: BTreeMap<String, String>,
    pub log_time: DateTime<Utc>,
    /// Logged by the SDK itself rather than the app.
    pub is_implicit: bool,
}

impl AppEvent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value_to_sum: None,
            parameters: BTreeMap::new(),
            log_time: Utc::now(),
            is_implicit: false,
        }
    }

    pub fn value_to_sum(mut self, value: f64) -> Self {
        self.value_to_sum = Some(value);
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    pub fn implicit(mut self) -> Self {
        self.is_implicit = true;
        self
    }

    /// Checks the name and every parameter key.
    pub fn validate(&self) -> Result<(), EventsError> {
        validate_identifier(&self.name)?;
        self.parameters
            .keys()
            .try_for_each(|key| validate_identifier(key))
    }

    /// Cuts parameter values longer than [`MAX_PARAMETER_VALUE_LEN`].
    pub(crate) fn truncate_values(&mut self) {
        for value in self.parameters.values_mut() {
            if let Some((idx, _)) = value.char_indices().nth(MAX_PARAMETER_VALUE_LEN) {
                value.truncate(idx);
            }
        }
    }

    /// Wire form used in the `custom_events` array.
    pub fn to_json(&self) -> Value {
        let mut object = Map::new();
        object.insert("_eventName".into(), json!(self.name));
        object.insert("_logTime".into(), json!(self.log_time.timestamp()));
        if let Some(value) = self.value_to_sum {
            object.insert("_valueToSum".into(), json!(value));
        }
        if self.is_implicit {
            object.insert("_implicitlyLogged".into(), json!("1"));
        }
        for (key, value) in &self.parameters {
            object.insert(key.clone(), json!(value));
        }
        Value::Object(object)
    }
}
