//! SQLite schema definitions and SQL query constants.
//!
//! Pure data, no I/O. Uniqueness of `employee_id`, `email` and
//! `(employee_id, date)` is enforced here; the services rely on it as the
//! final guard against racing writers.

/// SQL statement to create all tables.
pub const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS employees (
    id TEXT PRIMARY KEY,
    employee_id TEXT NOT NULL UNIQUE,
    full_name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    department TEXT NOT NULL,
    position TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS attendance (
    id TEXT PRIMARY KEY,
    employee_id TEXT NOT NULL,
    date TEXT NOT NULL,
    status TEXT NOT NULL CHECK (status IN ('Present', 'Absent')),
    notes TEXT,
    created_at TEXT NOT NULL,
    UNIQUE (employee_id, date)
);

CREATE INDEX IF NOT EXISTS idx_employees_department ON employees(department);
CREATE INDEX IF NOT EXISTS idx_employees_created_at ON employees(created_at);
CREATE INDEX IF NOT EXISTS idx_attendance_date ON attendance(date);
CREATE INDEX IF NOT EXISTS idx_attendance_status ON attendance(status);
"#;

// Employee queries
pub const INSERT_EMPLOYEE: &str = r#"
INSERT INTO employees (id, employee_id, full_name, email, department, position, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
"#;

pub const SELECT_EMPLOYEE_BY_EMPLOYEE_ID: &str = r#"
SELECT id, employee_id, full_name, email, department, position, created_at, updated_at
FROM employees
WHERE employee_id = ?1
"#;

pub const SELECT_EMPLOYEE_BY_EMAIL: &str = r#"
SELECT id, employee_id, full_name, email, department, position, created_at, updated_at
FROM employees
WHERE email = ?1
"#;

/// `?1` is the department, or NULL/empty for all departments.
/// Search terms are applied by the caller.
pub const SELECT_EMPLOYEES: &str = r#"
SELECT id, employee_id, full_name, email, department, position, created_at, updated_at
FROM employees
WHERE (?1 IS NULL OR ?1 = '' OR department = ?1)
ORDER BY created_at DESC
"#;

pub const COUNT_EMPLOYEES: &str = r#"
SELECT COUNT(*) FROM employees
"#;

pub const SELECT_DEPARTMENT_COUNTS: &str = r#"
SELECT department, COUNT(*) AS n
FROM employees
GROUP BY department
ORDER BY n DESC, department ASC
"#;

pub const UPDATE_EMPLOYEE: &str = r#"
UPDATE employees
SET full_name = ?2, email = ?3, department = ?4, position = ?5, updated_at = ?6
WHERE employee_id = ?1
"#;

pub const DELETE_EMPLOYEE: &str = r#"
DELETE FROM employees
WHERE employee_id = ?1
"#;

// Attendance queries
pub const INSERT_ATTENDANCE: &str = r#"
INSERT INTO attendance (id, employee_id, date, status, notes, created_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6)
"#;

pub const SELECT_ATTENDANCE_BY_ID: &str = r#"
SELECT id, employee_id, date, status, notes, created_at
FROM attendance
WHERE id = ?1
"#;

pub const SELECT_ATTENDANCE_BY_EMPLOYEE_AND_DATE: &str = r#"
SELECT id, employee_id, date, status, notes, created_at
FROM attendance
WHERE employee_id = ?1 AND date = ?2
"#;

/// Parameters: employee_id, exact date, range start, range end, status, limit.
/// NULL disables a condition.
pub const SELECT_ATTENDANCE_FILTERED: &str = r#"
SELECT id, employee_id, date, status, notes, created_at
FROM attendance
WHERE (?1 IS NULL OR employee_id = ?1)
  AND (?2 IS NULL OR date = ?2)
  AND (?3 IS NULL OR date >= ?3)
  AND (?4 IS NULL OR date <= ?4)
  AND (?5 IS NULL OR status = ?5)
ORDER BY date DESC, created_at DESC
LIMIT ?6
"#;

/// Same parameters as [`SELECT_ATTENDANCE_FILTERED`], without the limit.
pub const COUNT_ATTENDANCE_FILTERED: &str = r#"
SELECT COUNT(*)
FROM attendance
WHERE (?1 IS NULL OR employee_id = ?1)
  AND (?2 IS NULL OR date = ?2)
  AND (?3 IS NULL OR date >= ?3)
  AND (?4 IS NULL OR date <= ?4)
  AND (?5 IS NULL OR status = ?5)
"#;

pub const UPDATE_ATTENDANCE: &str = r#"
UPDATE attendance
SET status = ?2, notes = ?3
WHERE id = ?1
"#;

pub const DELETE_ATTENDANCE: &str = r#"
DELETE FROM attendance
WHERE id = ?1
"#;

pub const DELETE_ATTENDANCE_FOR_EMPLOYEE: &str = r#"
DELETE FROM attendance
WHERE employee_id = ?1
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_tables_is_valid_sql() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch(CREATE_TABLES).unwrap();
        // Idempotent.
        conn.execute_batch(CREATE_TABLES).unwrap();
    }

    #[test]
    fn test_all_queries_prepare() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch(CREATE_TABLES).unwrap();

        for sql in [
            INSERT_EMPLOYEE,
            SELECT_EMPLOYEE_BY_EMPLOYEE_ID,
            SELECT_EMPLOYEE_BY_EMAIL,
            SELECT_EMPLOYEES,
            COUNT_EMPLOYEES,
            SELECT_DEPARTMENT_COUNTS,
            UPDATE_EMPLOYEE,
            DELETE_EMPLOYEE,
            INSERT_ATTENDANCE,
            SELECT_ATTENDANCE_BY_ID,
            SELECT_ATTENDANCE_BY_EMPLOYEE_AND_DATE,
            SELECT_ATTENDANCE_FILTERED,
            COUNT_ATTENDANCE_FILTERED,
            UPDATE_ATTENDANCE,
            DELETE_ATTENDANCE,
            DELETE_ATTENDANCE_FOR_EMPLOYEE,
        ] {
            conn.prepare(sql)
                .unwrap_or_else(|e| panic!("failed to prepare {sql}: {e}"));
        }
    }

    #[test]
    fn test_attendance_unique_per_employee_and_date() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch(CREATE_TABLES).unwrap();

        conn.execute(
            INSERT_ATTENDANCE,
            ["a", "EMP-1", "2026-02-07", "Present", "", "2026-02-07T09:00:00Z"],
        )
        .unwrap();
        let duplicate = conn.execute(
            INSERT_ATTENDANCE,
            ["b", "EMP-1", "2026-02-07", "Absent", "", "2026-02-07T10:00:00Z"],
        );
        assert!(duplicate.is_err());
    }
}
