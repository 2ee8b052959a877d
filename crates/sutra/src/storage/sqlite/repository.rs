//! SQLite repository implementation.
//!
//! Implements the repository traits from `sutra_core::storage` using SQLite.

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio_rusqlite::Connection;
use uuid::Uuid;

use sutra_core::hr::{AttendanceRecord, Employee};
use sutra_core::storage::{
    AttendanceFilter, AttendanceRepository, EmployeeFilter, EmployeeRepository, RepositoryError,
    Result, LIST_LIMIT,
};

use super::conversions::{
    attendance_filter_params, count_to_u64, format_date, format_datetime, list_limit,
    row_to_attendance, row_to_department_count, row_to_employee,
};
use super::error::{map_tokio_rusqlite_error, map_tokio_rusqlite_error_with_id};
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// SQLite-based repository implementation.
///
/// Provides async access to SQLite storage for employees and attendance.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Creates a new repository with a file-based database.
    ///
    /// The database file will be created if it doesn't exist.
    /// Schema tables are created automatically.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Creates a new repository with an in-memory database.
    ///
    /// Useful for testing - data is lost when the connection is dropped.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Initialize the database schema.
    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TABLES)
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    /// Runs a statement that must touch exactly one row.
    async fn execute_one(
        &self,
        sql: &'static str,
        params: Vec<Option<String>>,
        entity_type: &'static str,
        id: String,
    ) -> Result<()> {
        let affected = self
            .conn
            .call(move |conn| {
                conn.execute(sql, rusqlite::params_from_iter(params.iter()))
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, entity_type, id.clone()))?;

        if affected == 0 {
            return Err(RepositoryError::NotFound { entity_type, id });
        }
        Ok(())
    }
}

// ============================================================================
// EmployeeRepository implementation
// ============================================================================

#[async_trait]
impl EmployeeRepository for SqliteRepository {
    async fn get_employee(&self, employee_id: &str) -> Result<Option<Employee>> {
        let id = employee_id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_EMPLOYEE_BY_EMPLOYEE_ID)
                    .map_err(wrap_err)?;
                match stmt.query_row([&id], row_to_employee) {
                    Ok(employee) => Ok(Some(employee)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Employee", employee_id))
    }

    async fn get_employee_by_email(&self, email: &str) -> Result<Option<Employee>> {
        let email_owned = email.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_EMPLOYEE_BY_EMAIL)
                    .map_err(wrap_err)?;
                match stmt.query_row([&email_owned], row_to_employee) {
                    Ok(employee) => Ok(Some(employee)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Employee", email))
    }

    async fn list_employees(&self, filter: &EmployeeFilter) -> Result<Vec<Employee>> {
        let department = filter.department.clone();

        let rows = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_EMPLOYEES).map_err(wrap_err)?;
                let rows = stmt
                    .query_map([&department], row_to_employee)
                    .map_err(wrap_err)?;

                let mut employees = Vec::new();
                for row_result in rows {
                    employees.push(row_result.map_err(wrap_err)?);
                }
                Ok(employees)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Employee"))?;

        // Name search runs after the department filter.
        Ok(rows
            .into_iter()
            .filter(|employee| filter.matches(employee))
            .take(LIST_LIMIT)
            .collect())
    }

    async fn count_employees(&self) -> Result<u64> {
        self.conn
            .call(|conn| {
                let count: i64 = conn
                    .query_row(schema::COUNT_EMPLOYEES, [], |row| row.get(0))
                    .map_err(wrap_err)?;
                Ok(count_to_u64(count))
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Employee"))
    }

    async fn department_counts(&self) -> Result<Vec<(String, u64)>> {
        self.conn
            .call(|conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_DEPARTMENT_COUNTS)
                    .map_err(wrap_err)?;
                let rows = stmt
                    .query_map([], row_to_department_count)
                    .map_err(wrap_err)?;

                let mut counts = Vec::new();
                for row_result in rows {
                    counts.push(row_result.map_err(wrap_err)?);
                }
                Ok(counts)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Employee"))
    }

    async fn create_employee(&self, employee: &Employee) -> Result<()> {
        let id_str = employee.id.to_string();
        let employee_id = employee.employee_id.clone();
        let full_name = employee.full_name.clone();
        let email = employee.email.clone();
        let department = employee.department.clone();
        let position = employee.position.clone();
        let created_at = format_datetime(&employee.created_at);
        let updated_at = format_datetime(&employee.updated_at);

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_EMPLOYEE,
                    [
                        &id_str,
                        &employee_id,
                        &full_name,
                        &email,
                        &department,
                        &position,
                        &created_at,
                        &updated_at,
                    ],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Employee", &employee.employee_id))
    }

    async fn update_employee(&self, employee: &Employee) -> Result<()> {
        self.execute_one(
            schema::UPDATE_EMPLOYEE,
            vec![
                Some(employee.employee_id.clone()),
                Some(employee.full_name.clone()),
                Some(employee.email.clone()),
                Some(employee.department.clone()),
                Some(employee.position.clone()),
                Some(format_datetime(&employee.updated_at)),
            ],
            "Employee",
            employee.employee_id.clone(),
        )
        .await
    }

    async fn delete_employee(&self, employee_id: &str) -> Result<()> {
        self.execute_one(
            schema::DELETE_EMPLOYEE,
            vec![Some(employee_id.to_string())],
            "Employee",
            employee_id.to_string(),
        )
        .await
    }
}

// ============================================================================
// AttendanceRepository implementation
// ============================================================================

#[async_trait]
impl AttendanceRepository for SqliteRepository {
    async fn get_attendance(&self, id: Uuid) -> Result<Option<AttendanceRecord>> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_ATTENDANCE_BY_ID)
                    .map_err(wrap_err)?;
                match stmt.query_row([&id_str], row_to_attendance) {
                    Ok(record) => Ok(Some(record)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "AttendanceRecord", id.to_string()))
    }

    async fn find_attendance(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>> {
        let employee_id_owned = employee_id.to_string();
        let date_str = format_date(&date);

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_ATTENDANCE_BY_EMPLOYEE_AND_DATE)
                    .map_err(wrap_err)?;
                match stmt.query_row([&employee_id_owned, &date_str], row_to_attendance) {
                    Ok(record) => Ok(Some(record)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "AttendanceRecord"))
    }

    async fn list_attendance(&self, filter: &AttendanceFilter) -> Result<Vec<AttendanceRecord>> {
        let [employee_id, date, start, end, status] = attendance_filter_params(filter);
        let limit = list_limit();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_ATTENDANCE_FILTERED)
                    .map_err(wrap_err)?;
                let rows = stmt
                    .query_map(
                        rusqlite::params![employee_id, date, start, end, status, limit],
                        row_to_attendance,
                    )
                    .map_err(wrap_err)?;

                let mut records = Vec::new();
                for row_result in rows {
                    records.push(row_result.map_err(wrap_err)?);
                }
                Ok(records)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "AttendanceRecord"))
    }

    async fn count_attendance(&self, filter: &AttendanceFilter) -> Result<u64> {
        let params = attendance_filter_params(filter);

        self.conn
            .call(move |conn| {
                let count: i64 = conn
                    .query_row(
                        schema::COUNT_ATTENDANCE_FILTERED,
                        rusqlite::params_from_iter(params.iter()),
                        |row| row.get(0),
                    )
                    .map_err(wrap_err)?;
                Ok(count_to_u64(count))
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "AttendanceRecord"))
    }

    async fn create_attendance(&self, record: &AttendanceRecord) -> Result<()> {
        let id_str = record.id.to_string();
        let employee_id = record.employee_id.clone();
        let date_str = format_date(&record.date);
        let status = record.status.as_str().to_string();
        let notes = record.notes.clone();
        let created_at = format_datetime(&record.created_at);

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_ATTENDANCE,
                    rusqlite::params![id_str, employee_id, date_str, status, notes, created_at],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| {
                map_tokio_rusqlite_error_with_id(
                    e,
                    "AttendanceRecord",
                    format!("{}@{}", record.employee_id, record.date),
                )
            })
    }

    async fn update_attendance(&self, record: &AttendanceRecord) -> Result<()> {
        self.execute_one(
            schema::UPDATE_ATTENDANCE,
            vec![
                Some(record.id.to_string()),
                Some(record.status.as_str().to_string()),
                record.notes.clone(),
            ],
            "AttendanceRecord",
            record.id.to_string(),
        )
        .await
    }

    async fn delete_attendance(&self, id: Uuid) -> Result<()> {
        self.execute_one(
            schema::DELETE_ATTENDANCE,
            vec![Some(id.to_string())],
            "AttendanceRecord",
            id.to_string(),
        )
        .await
    }

    async fn delete_attendance_for_employee(&self, employee_id: &str) -> Result<u64> {
        let employee_id_owned = employee_id.to_string();

        let removed = self
            .conn
            .call(move |conn| {
                conn.execute(schema::DELETE_ATTENDANCE_FOR_EMPLOYEE, [&employee_id_owned])
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "AttendanceRecord", employee_id))?;

        Ok(removed as u64)
    }
}
