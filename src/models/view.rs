use serde::{Deserialize, Serialize};

use super::{Employee, Position};

/// Transport-facing shape of an employee record.
///
/// Mirrors the persisted record minus the employment flag; clients learn about
/// firing through the fire endpoint's boolean outcome, not through the view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeView {
    pub id: i64,
    pub first_name: String,
    pub patronymic: String,
    pub sur_name: String,
    pub job_title: Position,
    pub leader_id: Option<i64>,
}

impl From<Employee> for EmployeeView {
    fn from(employee: Employee) -> Self {
        Self {
            id: employee.id,
            first_name: employee.first_name,
            patronymic: employee.patronymic,
            sur_name: employee.sur_name,
            job_title: employee.job_title,
            leader_id: employee.leader_id,
        }
    }
}
