mod schema;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use rusqlite::{params, Connection};

use crate::models::*;

/// Error surfaced by the hire path.
///
/// Hiring is the one mutation that reports business-rule violations as errors;
/// every other mutation reports them as an `Ok(false)` outcome with a logged
/// reason. Callers rely on that asymmetry.
#[derive(Debug, thiserror::Error)]
pub enum HireError {
    /// Malformed or incomplete candidate input.
    #[error("{0}")]
    Validation(String),
    /// The single-root/director exclusivity rule would be violated.
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Database(#[from] rusqlite::Error),
}

/// The hierarchy store: sole authority over the employee roster.
///
/// Every mutating operation runs as one SQLite transaction, so multi-record
/// updates (succession's reparent-and-promote in particular) either commit
/// together or not at all.
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: PathBuf) -> Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Database path has no parent directory"))?;
        std::fs::create_dir_all(parent)?;
        let conn = Connection::open(&path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_default() -> Result<Self> {
        let dirs = directories::ProjectDirs::from("", "", "staff-roster")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        let db_path = dirs.data_dir().join("roster.db");
        Self::open(db_path)
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        schema::run_migrations(&conn)
    }

    // ============================================================
    // Hiring
    // ============================================================

    /// Hire one candidate, assigning a fresh id.
    ///
    /// A candidate with no leader, an unresolvable leader, or the director
    /// title is a root hire and is rejected with [`HireError::Conflict`] while
    /// an employed root or director already exists.
    pub fn hire(&self, input: HireEmployeeInput) -> Result<Employee, HireError> {
        let mut conn = self.conn.lock().expect("database lock poisoned");
        let tx = conn.transaction()?;
        let employee = hire_in_tx(&tx, &input)?;
        tx.commit()?;

        tracing::info!("Employee id:{} hired", employee.id);
        Ok(employee)
    }

    /// Hire a batch of candidates, all-or-nothing.
    ///
    /// Candidates are checked in input order against the state including
    /// earlier candidates of the same batch, so at most one of them can
    /// become the root. The first rejection rolls the whole batch back.
    pub fn hire_many(&self, inputs: Vec<HireEmployeeInput>) -> Result<Vec<Employee>, HireError> {
        let mut conn = self.conn.lock().expect("database lock poisoned");
        let tx = conn.transaction()?;

        let mut employees = Vec::with_capacity(inputs.len());
        for input in &inputs {
            employees.push(hire_in_tx(&tx, input)?);
        }
        tx.commit()?;

        tracing::info!("{} employees hired", employees.len());
        Ok(employees)
    }

    // ============================================================
    // Firing and succession
    // ============================================================

    /// Fire an employee.
    ///
    /// When the employee has employed direct reports, `new_leader_id` must
    /// name an immediate report to promote; succession reparents the rest of
    /// the reports to the successor and moves it into the vacated position
    /// and title. The fired record keeps its own `leader_id`.
    ///
    /// Business-rule rejections (unknown employee, already fired, missing or
    /// invalid successor) return `Ok(false)` and leave the roster unchanged.
    pub fn fire(&self, id: i64, new_leader_id: Option<i64>) -> Result<bool> {
        let mut conn = self.conn.lock().expect("database lock poisoned");
        let tx = conn.transaction()?;

        let Some(employee) = fetch_employee(&tx, id)? else {
            tracing::warn!("Employee id:{} not found", id);
            return Ok(false);
        };

        if !employee.is_employed {
            tracing::warn!("Cannot fire employee id:{}: already fired", id);
            return Ok(false);
        }

        if employed_subordinate_count(&tx, id)? > 0 {
            let Some(new_leader_id) = new_leader_id else {
                tracing::warn!(
                    "Employee id:{} has subordinates but no successor designated",
                    id
                );
                return Ok(false);
            };

            if fetch_employee(&tx, new_leader_id)?.is_none() {
                tracing::warn!("Designated successor id:{} not found", new_leader_id);
                return Ok(false);
            }

            if !succeed_leader(&tx, id, new_leader_id)? {
                return Ok(false);
            }

            tracing::info!(
                "Subordinates of employee id:{} reassigned to leader id:{}",
                id,
                new_leader_id
            );
        }

        tx.execute("UPDATE employees SET is_employed = 0 WHERE id = ?", [id])?;
        tx.commit()?;

        tracing::info!("Employee id:{} fired", id);
        Ok(true)
    }

    /// Promote a direct report of `old_leader_id` into its leader's position.
    ///
    /// All other employed direct reports of the old leader are reparented to
    /// the successor, and the successor takes over the old leader's own
    /// `leader_id` and `job_title` in the same transaction.
    pub fn set_new_leader(&self, old_leader_id: i64, new_leader_id: i64) -> Result<bool> {
        let mut conn = self.conn.lock().expect("database lock poisoned");
        let tx = conn.transaction()?;

        if !succeed_leader(&tx, old_leader_id, new_leader_id)? {
            return Ok(false);
        }
        tx.commit()?;

        tracing::info!(
            "All subordinates of employee id:{} now report to employee id:{}",
            old_leader_id,
            new_leader_id
        );
        Ok(true)
    }

    /// Reassign a single employee to a new leader.
    ///
    /// Only lateral moves are allowed: the new leader must already be a direct
    /// report of the subordinate's current leader. A subordinate without a
    /// leader skips that check.
    pub fn set_leader(&self, subordinate_id: i64, new_leader_id: i64) -> Result<bool> {
        let mut conn = self.conn.lock().expect("database lock poisoned");
        let tx = conn.transaction()?;

        let Some(subordinate) = fetch_employee(&tx, subordinate_id)? else {
            tracing::warn!("Employee id:{} not found", subordinate_id);
            return Ok(false);
        };

        if fetch_employee(&tx, new_leader_id)?.is_none() {
            tracing::warn!("Employee id:{} not found", new_leader_id);
            return Ok(false);
        }

        if let Some(old_leader_id) = subordinate.leader_id {
            if fetch_employee(&tx, old_leader_id)?.is_none() {
                tracing::warn!("Employee id:{} not found", old_leader_id);
                return Ok(false);
            }

            if !is_direct_subordinate(&tx, old_leader_id, new_leader_id)? {
                tracing::warn!(
                    "Employee id:{} is not an immediate report of employee id:{}",
                    new_leader_id,
                    old_leader_id
                );
                return Ok(false);
            }
        }

        tx.execute(
            "UPDATE employees SET leader_id = ? WHERE id = ?",
            params![new_leader_id, subordinate_id],
        )?;
        tx.commit()?;

        tracing::info!(
            "Employee id:{} now reports to employee id:{}",
            subordinate_id,
            new_leader_id
        );
        Ok(true)
    }

    // ============================================================
    // Deletion
    // ============================================================

    /// Physically remove a fired employee.
    ///
    /// Active employees cannot be deleted. Remaining references to the
    /// deleted id are nulled by the foreign key's SET NULL action.
    pub fn delete(&self, id: i64) -> Result<bool> {
        let mut conn = self.conn.lock().expect("database lock poisoned");
        let tx = conn.transaction()?;

        let Some(employee) = fetch_employee(&tx, id)? else {
            tracing::warn!("Employee id:{} not found", id);
            return Ok(false);
        };

        if employee.is_employed {
            tracing::warn!("Cannot delete employee id:{}: not fired yet", id);
            return Ok(false);
        }

        tx.execute("DELETE FROM employees WHERE id = ?", [id])?;
        tx.commit()?;

        tracing::info!("Employee id:{} deleted", id);
        Ok(true)
    }

    /// Administrative reset: remove every record, employed or not.
    pub fn delete_all(&self) -> Result<bool> {
        let conn = self.conn.lock().expect("database lock poisoned");
        conn.execute("DELETE FROM employees", [])?;

        tracing::info!("All employees deleted");
        Ok(true)
    }

    // ============================================================
    // Queries
    // ============================================================

    /// Every record, fired ones included.
    pub fn get_all(&self) -> Result<Vec<Employee>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, first_name, patronymic, sur_name, job_title, is_employed, leader_id
             FROM employees ORDER BY id",
        )?;

        let employees = stmt
            .query_map([], employee_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(employees)
    }

    pub fn get_all_employed(&self) -> Result<Vec<Employee>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, first_name, patronymic, sur_name, job_title, is_employed, leader_id
             FROM employees WHERE is_employed = 1 ORDER BY id",
        )?;

        let employees = stmt
            .query_map([], employee_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(employees)
    }

    /// Employed direct reports of the given leader.
    pub fn get_subordinates(&self, leader_id: i64) -> Result<Vec<Employee>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, first_name, patronymic, sur_name, job_title, is_employed, leader_id
             FROM employees WHERE is_employed = 1 AND leader_id = ? ORDER BY id",
        )?;

        let employees = stmt
            .query_map([leader_id], employee_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(employees)
    }

    pub fn get_employee(&self, id: i64) -> Result<Option<Employee>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        Ok(fetch_employee(&conn, id)?)
    }

    /// Three-valued: `None` when the employee does not exist.
    pub fn has_subordinates(&self, id: i64) -> Result<Option<bool>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        if fetch_employee(&conn, id)?.is_none() {
            return Ok(None);
        }
        Ok(Some(employed_subordinate_count(&conn, id)? > 0))
    }

    /// Three-valued: `None` when the employee does not exist.
    pub fn is_employed(&self, id: i64) -> Result<Option<bool>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        Ok(fetch_employee(&conn, id)?.map(|emp| emp.is_employed))
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
        }
    }
}

fn employee_from_row(row: &rusqlite::Row) -> rusqlite::Result<Employee> {
    Ok(Employee {
        id: row.get(0)?,
        first_name: row.get(1)?,
        patronymic: row.get(2)?,
        sur_name: row.get(3)?,
        job_title: Position::from_str(&row.get::<_, String>(4)?).unwrap_or(Position::Developer),
        is_employed: row.get::<_, i32>(5)? != 0,
        leader_id: row.get(6)?,
    })
}

fn fetch_employee(conn: &Connection, id: i64) -> rusqlite::Result<Option<Employee>> {
    let mut stmt = conn.prepare(
        "SELECT id, first_name, patronymic, sur_name, job_title, is_employed, leader_id
         FROM employees WHERE id = ?",
    )?;

    let mut rows = stmt.query([id])?;
    match rows.next()? {
        Some(row) => Ok(Some(employee_from_row(row)?)),
        None => Ok(None),
    }
}

fn employed_subordinate_count(conn: &Connection, leader_id: i64) -> rusqlite::Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM employees WHERE is_employed = 1 AND leader_id = ?",
        [leader_id],
        |row| row.get(0),
    )
}

fn is_direct_subordinate(
    conn: &Connection,
    leader_id: i64,
    employee_id: i64,
) -> rusqlite::Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM employees
         WHERE is_employed = 1 AND leader_id = ? AND id = ?",
        [leader_id, employee_id],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// True when an employed record already holds the root position, either by
/// having no leader or by carrying the director title.
fn root_or_director_exists(conn: &Connection) -> rusqlite::Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM employees
         WHERE is_employed = 1 AND (leader_id IS NULL OR job_title = ?)",
        [Position::Director.as_str()],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

fn validate_candidate(input: &HireEmployeeInput) -> Result<(), HireError> {
    if input.first_name.trim().is_empty()
        || input.patronymic.trim().is_empty()
        || input.sur_name.trim().is_empty()
    {
        let msg = "Candidate is malformed: first name, patronymic and surname are required";
        tracing::error!("{}", msg);
        return Err(HireError::Validation(msg.to_string()));
    }
    Ok(())
}

fn hire_in_tx(conn: &Connection, input: &HireEmployeeInput) -> Result<Employee, HireError> {
    validate_candidate(input)?;

    let leader_exists = match input.leader_id {
        Some(id) => fetch_employee(conn, id)?.is_some(),
        None => false,
    };

    if input.leader_id.is_none() || !leader_exists || input.job_title == Position::Director {
        if root_or_director_exists(conn)? {
            let msg = "Hiring rejected: an employed director or employee \
                       without a leader already exists";
            tracing::error!("{}", msg);
            return Err(HireError::Conflict(msg.to_string()));
        }
    }

    // A leader reference that does not resolve is dropped; the new hire
    // becomes the root instead of carrying a dangling id.
    let leader_id = if leader_exists { input.leader_id } else { None };

    conn.execute(
        "INSERT INTO employees (first_name, patronymic, sur_name, job_title, is_employed, leader_id)
         VALUES (?, ?, ?, ?, 1, ?)",
        params![
            &input.first_name,
            &input.patronymic,
            &input.sur_name,
            input.job_title.as_str(),
            leader_id,
        ],
    )?;

    Ok(Employee {
        id: conn.last_insert_rowid(),
        first_name: input.first_name.clone(),
        patronymic: input.patronymic.clone(),
        sur_name: input.sur_name.clone(),
        job_title: input.job_title,
        is_employed: true,
        leader_id,
    })
}

/// Succession core, shared by `fire` and `set_new_leader`.
///
/// The successor must be an employed immediate report of the old leader. The
/// remaining employed reports are reparented to the successor, which then
/// takes over the old leader's `leader_id` and `job_title`.
fn succeed_leader(conn: &Connection, old_leader_id: i64, new_leader_id: i64) -> Result<bool> {
    let Some(old_leader) = fetch_employee(conn, old_leader_id)? else {
        tracing::warn!("Employee id:{} not found", old_leader_id);
        return Ok(false);
    };

    if fetch_employee(conn, new_leader_id)?.is_none() {
        tracing::warn!("Employee id:{} not found", new_leader_id);
        return Ok(false);
    }

    if !is_direct_subordinate(conn, old_leader_id, new_leader_id)? {
        tracing::warn!(
            "Employee id:{} is not an immediate report of employee id:{}",
            new_leader_id,
            old_leader_id
        );
        return Ok(false);
    }

    conn.execute(
        "UPDATE employees SET leader_id = ?1 WHERE is_employed = 1 AND leader_id = ?2 AND id != ?1",
        params![new_leader_id, old_leader_id],
    )?;

    // Promotion into the vacated position.
    conn.execute(
        "UPDATE employees SET leader_id = ?, job_title = ? WHERE id = ?",
        params![
            old_leader.leader_id,
            old_leader.job_title.as_str(),
            new_leader_id
        ],
    )?;

    Ok(true)
}
