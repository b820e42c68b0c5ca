use std::sync::Arc;

use super::{ColumnRole, ColumnRoles, Partition, SessionConfiguration, SplitPlan};
use crate::dataset::Row;

/// Read-only view of the planner handed to charts and model configuration.
///
/// Rows are shared with the planner; consumers derive their own view state.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanSnapshot {
    pub file_name: String,
    pub columns: Vec<String>,
    pub rows: Arc<Vec<Row>>,
    pub column_roles: ColumnRoles,
    pub split_plan: SplitPlan,
    pub is_valid: bool,
}

impl PlanSnapshot {
    pub(crate) fn of(session: &SessionConfiguration) -> Self {
        Self {
            file_name: session.file_name.clone(),
            columns: session.dataset.columns().to_vec(),
            rows: session.dataset.shared_rows(),
            column_roles: session.column_roles.clone(),
            split_plan: session.split_plan,
            is_valid: session.is_valid(),
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn columns_with_role(&self, role: ColumnRole) -> Vec<&str> {
        self.column_roles.columns_with(&self.columns, role)
    }

    pub fn reference_column(&self) -> Option<&str> {
        self.column_roles.reference()
    }

    /// Train / validation / test rows, or `None` while the plan is invalid.
    pub fn partition(&self) -> Option<Partition<'_, Row>> {
        self.split_plan.partition(self.rows.as_slice())
    }
}

/// Change notifications delivered to subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanEvent {
    /// The session was created, restored or edited.
    Updated(PlanSnapshot),
    /// The file was removed and the session cleared.
    Cleared,
}
