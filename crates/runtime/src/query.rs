use std::collections::BTreeMap;

use serde::Serialize;

use crate::variables::{VariableCommand, VariableValue};

/// Prefix hosts use for template variables in the URL query.
pub const QUERY_VAR_PREFIX: &str = "var-";

/// A URL query update in the shape dashboard hosts accept.
///
/// `partial` merges with the existing query instead of replacing it, and
/// `replace` swaps the current history entry rather than pushing a new one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationUpdate {
    pub query: BTreeMap<String, VariableValue>,
    pub partial: bool,
    pub replace: bool,
}

impl LocationUpdate {
    pub fn from_command(command: &VariableCommand) -> Self {
        let query = command
            .assignments()
            .into_iter()
            .map(|(name, value)| (format!("{QUERY_VAR_PREFIX}{name}"), value.clone()))
            .collect();
        Self {
            query,
            partial: true,
            replace: true,
        }
    }

    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl VariableCommand {
    pub fn query_update(&self) -> LocationUpdate {
        LocationUpdate::from_command(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::variables::{VariableCommand, VariableValue};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn prefixes_variable_names() {
        let update = VariableCommand::set("selected", Some("a")).query_update();
        assert!(update.partial);
        assert!(update.replace);
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({"query": {"var-selected": "a"}, "partial": true, "replace": true})
        );
    }

    #[test]
    fn batch_becomes_one_update() {
        let update = VariableCommand::batch([
            ("minLat", VariableValue::Number(10.0)),
            ("maxLat", VariableValue::Number(30.0)),
        ])
        .query_update();
        assert_eq!(update.query.len(), 2);
        assert_eq!(update.query["var-maxLat"], VariableValue::Number(30.0));
    }

    #[test]
    fn unset_is_null_in_json() {
        let json = VariableCommand::set("selected", VariableValue::Unset)
            .query_update()
            .to_json_string()
            .unwrap();
        assert_eq!(json, r#"{"query":{"var-selected":null},"partial":true,"replace":true}"#);
    }
}
