//! Test-data generation for the roster.
//!
//! Rebuilds the hierarchy from scratch: one director, a manager and a team
//! lead under the director, then two waves of rank-and-file employees. The
//! first wave reports to the manager and team lead, the second wave reports
//! to the first. Names and titles cycle through fixed pools so seeding is
//! deterministic.

use anyhow::Result;

use crate::db::Database;
use crate::models::{Employee, HireEmployeeInput, Position};

const FIRST_NAMES: &[&str] = &[
    "Ivan", "Petr", "Sidor", "Alexey", "Dmitry", "Alexander", "Maxim", "Denis", "Anatoly",
    "Vladimir",
];

const PATRONYMICS: &[&str] = &[
    "Ivanovich",
    "Petrovich",
    "Sidorovich",
    "Alexeevich",
    "Dmitrievich",
    "Alexandrovich",
    "Maximovich",
    "Denisovich",
    "Anatolievich",
    "Vladimirovich",
];

const SUR_NAMES: &[&str] = &[
    "Ivanov",
    "Petrov",
    "Sidorov",
    "Alexeev",
    "Dmitriev",
    "Alexandrov",
    "Maximov",
    "Denisov",
    "Anatoliev",
    "Vladimirov",
];

const STAFF_TITLES: &[Position] = &[
    Position::Developer,
    Position::QaEngineer,
    Position::Designer,
    Position::Analyst,
    Position::Administrator,
    Position::SupportSpecialist,
];

fn candidate(index: usize, job_title: Position, leader_id: Option<i64>) -> HireEmployeeInput {
    HireEmployeeInput {
        first_name: FIRST_NAMES[index % FIRST_NAMES.len()].to_string(),
        patronymic: PATRONYMICS[index % PATRONYMICS.len()].to_string(),
        sur_name: SUR_NAMES[index % SUR_NAMES.len()].to_string(),
        job_title,
        leader_id,
    }
}

/// Generate a wave of staff candidates, cycling through the given leaders.
fn staff_wave(count: u32, leader_ids: &[i64]) -> Vec<HireEmployeeInput> {
    (0..count as usize)
        .map(|i| {
            candidate(
                i,
                STAFF_TITLES[i % STAFF_TITLES.len()],
                Some(leader_ids[i % leader_ids.len()]),
            )
        })
        .collect()
}

/// Replace the entire roster with `count + 3` generated employees.
pub fn seed_test_data(db: &Database, count: u32) -> Result<Vec<Employee>> {
    db.delete_all()?;

    let director = db.hire(candidate(0, Position::Director, None))?;
    let manager = db.hire(candidate(1, Position::Manager, Some(director.id)))?;
    let team_lead = db.hire(candidate(2, Position::TeamLead, Some(director.id)))?;

    let mut employees = vec![director, manager.clone(), team_lead.clone()];

    let first_wave = db.hire_many(staff_wave(count / 2, &[manager.id, team_lead.id]))?;

    if !first_wave.is_empty() {
        let leader_ids: Vec<i64> = first_wave.iter().map(|emp| emp.id).collect();
        let second_wave = db.hire_many(staff_wave(count / 2, &leader_ids))?;
        employees.extend(first_wave);
        employees.extend(second_wave);
    }

    tracing::info!("Seeded {} test employees", employees.len());
    Ok(employees)
}
