use serde::{Deserialize, Serialize};

/// A member of the company roster.
///
/// Employees form a strict single-rooted hierarchy via `leader_id`: exactly one
/// employed record (the director) has no leader, and every other employed record
/// reports to another employee. Firing flips `is_employed` to `false` and never
/// back; only fired records may be physically deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: i64,
    pub first_name: String,
    pub patronymic: String,
    pub sur_name: String,
    pub job_title: Position,
    pub is_employed: bool,
    /// Direct leader. `None` only for the single root employee.
    pub leader_id: Option<i64>,
}

/// Closed set of positions in the organization.
///
/// The engine attaches no ranking to these beyond the special status of
/// `Director`: at most one employed director may exist, and the exclusivity
/// check treats "director" and "has no leader" as the same singleton condition.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    Director,
    Manager,
    TeamLead,
    Developer,
    QaEngineer,
    Designer,
    Analyst,
    Administrator,
    SupportSpecialist,
}

impl Position {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Director => "director",
            Self::Manager => "manager",
            Self::TeamLead => "team_lead",
            Self::Developer => "developer",
            Self::QaEngineer => "qa_engineer",
            Self::Designer => "designer",
            Self::Analyst => "analyst",
            Self::Administrator => "administrator",
            Self::SupportSpecialist => "support_specialist",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "director" => Some(Self::Director),
            "manager" => Some(Self::Manager),
            "team_lead" => Some(Self::TeamLead),
            "developer" => Some(Self::Developer),
            "qa_engineer" => Some(Self::QaEngineer),
            "designer" => Some(Self::Designer),
            "analyst" => Some(Self::Analyst),
            "administrator" => Some(Self::Administrator),
            "support_specialist" => Some(Self::SupportSpecialist),
            _ => None,
        }
    }
}

/// Input for hiring a new employee. The id is assigned by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HireEmployeeInput {
    pub first_name: String,
    pub patronymic: String,
    pub sur_name: String,
    pub job_title: Position,
    /// Leader for the new hire. `None` (or an id that does not resolve) makes
    /// the candidate a root hire, which is only accepted while no employed
    /// root or director exists.
    pub leader_id: Option<i64>,
}

/// Input for firing an employee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FireEmployeeInput {
    /// Successor taking over the fired employee's direct reports. Required
    /// when the employee has employed subordinates, ignored otherwise.
    #[serde(default)]
    pub new_leader_id: Option<i64>,
}
