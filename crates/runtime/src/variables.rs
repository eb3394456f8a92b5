use serde::{Deserialize, Serialize};

/// Value written to a host variable.
///
/// `Unset` serializes as `null`; hosts treat that as clearing the variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariableValue {
    Text(String),
    Number(f64),
    Unset,
}

impl VariableValue {
    pub fn text(s: impl Into<String>) -> Self {
        VariableValue::Text(s.into())
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, VariableValue::Unset)
    }
}

impl From<Option<&str>> for VariableValue {
    fn from(value: Option<&str>) -> Self {
        match value {
            Some(s) => VariableValue::text(s),
            None => VariableValue::Unset,
        }
    }
}

impl From<f64> for VariableValue {
    fn from(value: f64) -> Self {
        VariableValue::Number(value)
    }
}

impl std::fmt::Display for VariableValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VariableValue::Text(s) => write!(f, "{s}"),
            VariableValue::Number(n) => write!(f, "{n}"),
            VariableValue::Unset => Ok(()),
        }
    }
}

/// A write request against the host's variable store.
///
/// Commands are partial: variables not named keep their current value.
#[derive(Debug, Clone, PartialEq)]
pub enum VariableCommand {
    Set { name: String, value: VariableValue },
    /// Several variables applied as one update.
    BatchSet(Vec<(String, VariableValue)>),
}

impl VariableCommand {
    pub fn set(name: impl Into<String>, value: impl Into<VariableValue>) -> Self {
        VariableCommand::Set {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn batch<N: Into<String>>(entries: impl IntoIterator<Item = (N, VariableValue)>) -> Self {
        VariableCommand::BatchSet(entries.into_iter().map(|(n, v)| (n.into(), v)).collect())
    }

    /// `(name, value)` pairs in the order they were given.
    pub fn assignments(&self) -> Vec<(&str, &VariableValue)> {
        match self {
            VariableCommand::Set { name, value } => vec![(name.as_str(), value)],
            VariableCommand::BatchSet(entries) => {
                entries.iter().map(|(n, v)| (n.as_str(), v)).collect()
            }
        }
    }

    pub fn value_of(&self, name: &str) -> Option<&VariableValue> {
        self.assignments()
            .into_iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }
}

#[cfg(test)]
mod tests {
    use super::{VariableCommand, VariableValue};
    use serde_json::json;

    #[test]
    fn values_serialize_as_plain_json() {
        assert_eq!(serde_json::to_value(VariableValue::text("a")).unwrap(), json!("a"));
        assert_eq!(serde_json::to_value(VariableValue::Number(1.5)).unwrap(), json!(1.5));
        assert_eq!(serde_json::to_value(VariableValue::Unset).unwrap(), json!(null));
    }

    #[test]
    fn optional_text_maps_to_unset() {
        assert_eq!(VariableValue::from(Some("x")), VariableValue::text("x"));
        assert!(VariableValue::from(None).is_unset());
        assert_eq!(VariableValue::Unset.to_string(), "");
        assert_eq!(VariableValue::Number(10.0).to_string(), "10");
    }

    #[test]
    fn batch_keeps_assignment_order() {
        let cmd = VariableCommand::batch([
            ("b", VariableValue::Number(2.0)),
            ("a", VariableValue::Number(1.0)),
        ]);
        let names: Vec<&str> = cmd.assignments().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(cmd.value_of("a"), Some(&VariableValue::Number(1.0)));
        assert_eq!(cmd.value_of("c"), None);
    }
}
