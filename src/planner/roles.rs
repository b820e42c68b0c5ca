use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// How a column is used downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnRole {
    /// Model feature.
    Input,
    /// Prediction target.
    Output,
    /// Chart x-axis / row key. At most one column holds this role.
    Reference,
    /// Ignored.
    Unused,
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Input => "input",
            Self::Output => "output",
            Self::Reference => "reference",
            Self::Unused => "unused",
        };
        f.write_str(label)
    }
}

/// Role assignment per column name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnRoles(BTreeMap<String, ColumnRole>);

impl ColumnRoles {
    /// Default roles for freshly parsed columns: reference, input, output, then unused.
    pub fn with_defaults(columns: &[String]) -> Self {
        const LEADING: [ColumnRole; 3] = [ColumnRole::Reference, ColumnRole::Input, ColumnRole::Output];
        let roles = columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let role = LEADING.get(idx).copied().unwrap_or(ColumnRole::Unused);
                (column.clone(), role)
            })
            .collect();
        Self(roles)
    }

    pub fn get(&self, column: &str) -> Option<ColumnRole> {
        self.0.get(column).copied()
    }

    /// Set `column`'s role. Assigning `Reference` demotes the previous reference column.
    pub fn assign(&mut self, column: &str, role: ColumnRole) {
        if role == ColumnRole::Reference {
            for (name, current) in self.0.iter_mut() {
                if *current == ColumnRole::Reference && name != column {
                    *current = ColumnRole::Unused;
                }
            }
        }
        self.0.insert(column.to_string(), role);
    }

    /// Column holding the reference role, if any.
    pub fn reference(&self) -> Option<&str> {
        self.0
            .iter()
            .find(|(_, role)| **role == ColumnRole::Reference)
            .map(|(name, _)| name.as_str())
    }

    /// Columns with `role`, in the order given by `columns`.
    pub fn columns_with<'a>(&self, columns: &'a [String], role: ColumnRole) -> Vec<&'a str> {
        columns
            .iter()
            .filter(|column| self.get(column) == Some(role))
            .map(String::as_str)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ColumnRole)> {
        self.0.iter().map(|(name, role)| (name.as_str(), *role))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn defaults_follow_column_order() {
        let cols = columns(&["time", "temp", "dbp", "ph", "status"]);
        let roles = ColumnRoles::with_defaults(&cols);
        assert_eq!(roles.get("time"), Some(ColumnRole::Reference));
        assert_eq!(roles.get("temp"), Some(ColumnRole::Input));
        assert_eq!(roles.get("dbp"), Some(ColumnRole::Output));
        assert_eq!(roles.get("ph"), Some(ColumnRole::Unused));
        assert_eq!(roles.get("status"), Some(ColumnRole::Unused));
    }

    #[test]
    fn short_tables_only_get_leading_defaults() {
        let cols = columns(&["time", "dbp"]);
        let roles = ColumnRoles::with_defaults(&cols);
        assert_eq!(roles.len(), 2);
        assert_eq!(roles.get("dbp"), Some(ColumnRole::Input));
        assert!(roles.columns_with(&cols, ColumnRole::Output).is_empty());
    }

    #[test]
    fn reassigning_reference_demotes_previous_holder() {
        let cols = columns(&["a", "b", "c", "d"]);
        let mut roles = ColumnRoles::with_defaults(&cols);
        roles.assign("c", ColumnRole::Reference);
        assert_eq!(roles.reference(), Some("c"));
        assert_eq!(roles.get("a"), Some(ColumnRole::Unused));
        assert_eq!(roles.get("b"), Some(ColumnRole::Input));
        assert_eq!(roles.get("d"), Some(ColumnRole::Unused));
        assert_eq!(roles.columns_with(&cols, ColumnRole::Reference), vec!["c"]);
    }

    #[test]
    fn reassigning_same_role_is_stable() {
        let cols = columns(&["a", "b"]);
        let mut roles = ColumnRoles::with_defaults(&cols);
        let before = roles.clone();
        roles.assign("a", ColumnRole::Reference);
        assert_eq!(roles, before);
    }

    #[test]
    fn serializes_as_lowercase_map() {
        let roles = ColumnRoles::with_defaults(&columns(&["t", "x", "y", "z"]));
        let json = serde_json::to_string(&roles).unwrap();
        assert_eq!(
            json,
            r#"{"t":"reference","x":"input","y":"output","z":"unused"}"#
        );
    }
}
