//! In-memory repository implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;
use uuid::Uuid;

use sutra_core::hr::{
    sort_attendance_newest_first, sort_employees_newest_first, AttendanceRecord, Employee,
};
use sutra_core::storage::{
    AttendanceFilter, AttendanceRepository, EmployeeFilter, EmployeeRepository, RepositoryError,
    Result, LIST_LIMIT,
};

/// In-memory storage backend.
///
/// Uses HashMaps wrapped in `Arc<RwLock<_>>` for thread-safe access.
/// Data is not persisted and will be lost when the repository is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    /// Keyed by `employee_id`.
    employees: Arc<RwLock<HashMap<String, Employee>>>,
    attendance: Arc<RwLock<HashMap<Uuid, AttendanceRecord>>>,
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EmployeeRepository for InMemoryRepository {
    async fn get_employee(&self, employee_id: &str) -> Result<Option<Employee>> {
        let employees = self.employees.read().await;
        Ok(employees.get(employee_id).cloned())
    }

    async fn get_employee_by_email(&self, email: &str) -> Result<Option<Employee>> {
        let employees = self.employees.read().await;
        Ok(employees.values().find(|e| e.email == email).cloned())
    }

    async fn list_employees(&self, filter: &EmployeeFilter) -> Result<Vec<Employee>> {
        let employees = self.employees.read().await;
        let mut matching: Vec<Employee> = employees
            .values()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();
        sort_employees_newest_first(&mut matching);
        matching.truncate(LIST_LIMIT);
        Ok(matching)
    }

    async fn count_employees(&self) -> Result<u64> {
        let employees = self.employees.read().await;
        Ok(employees.len() as u64)
    }

    async fn department_counts(&self) -> Result<Vec<(String, u64)>> {
        let employees = self.employees.read().await;
        let mut counts: HashMap<String, u64> = HashMap::new();
        for employee in employees.values() {
            *counts.entry(employee.department.clone()).or_default() += 1;
        }
        let mut counts: Vec<(String, u64)> = counts.into_iter().collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        Ok(counts)
    }

    async fn create_employee(&self, employee: &Employee) -> Result<()> {
        let mut employees = self.employees.write().await;
        if employees.contains_key(&employee.employee_id) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "Employee",
                id: employee.employee_id.clone(),
            });
        }
        if employees.values().any(|e| e.email == employee.email) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "Employee",
                id: employee.email.clone(),
            });
        }
        employees.insert(employee.employee_id.clone(), employee.clone());
        Ok(())
    }

    async fn update_employee(&self, employee: &Employee) -> Result<()> {
        let mut employees = self.employees.write().await;
        if !employees.contains_key(&employee.employee_id) {
            return Err(RepositoryError::NotFound {
                entity_type: "Employee",
                id: employee.employee_id.clone(),
            });
        }
        if employees
            .values()
            .any(|e| e.email == employee.email && e.employee_id != employee.employee_id)
        {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "Employee",
                id: employee.email.clone(),
            });
        }
        employees.insert(employee.employee_id.clone(), employee.clone());
        Ok(())
    }

    async fn delete_employee(&self, employee_id: &str) -> Result<()> {
        let mut employees = self.employees.write().await;
        if employees.remove(employee_id).is_none() {
            return Err(RepositoryError::NotFound {
                entity_type: "Employee",
                id: employee_id.to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl AttendanceRepository for InMemoryRepository {
    async fn get_attendance(&self, id: Uuid) -> Result<Option<AttendanceRecord>> {
        let attendance = self.attendance.read().await;
        Ok(attendance.get(&id).cloned())
    }

    async fn find_attendance(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>> {
        let attendance = self.attendance.read().await;
        Ok(attendance
            .values()
            .find(|r| r.employee_id == employee_id && r.date == date)
            .cloned())
    }

    async fn list_attendance(&self, filter: &AttendanceFilter) -> Result<Vec<AttendanceRecord>> {
        let attendance = self.attendance.read().await;
        let mut matching: Vec<AttendanceRecord> = attendance
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        sort_attendance_newest_first(&mut matching);
        matching.truncate(LIST_LIMIT);
        Ok(matching)
    }

    async fn count_attendance(&self, filter: &AttendanceFilter) -> Result<u64> {
        let attendance = self.attendance.read().await;
        Ok(attendance.values().filter(|r| filter.matches(r)).count() as u64)
    }

    async fn create_attendance(&self, record: &AttendanceRecord) -> Result<()> {
        let mut attendance = self.attendance.write().await;
        if attendance
            .values()
            .any(|r| r.employee_id == record.employee_id && r.date == record.date)
        {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "AttendanceRecord",
                id: format!("{}/{}", record.employee_id, record.date),
            });
        }
        let mut stored = record.clone();
        stored.employee_name = None;
        attendance.insert(stored.id, stored);
        Ok(())
    }

    async fn update_attendance(&self, record: &AttendanceRecord) -> Result<()> {
        let mut attendance = self.attendance.write().await;
        if !attendance.contains_key(&record.id) {
            return Err(RepositoryError::NotFound {
                entity_type: "AttendanceRecord",
                id: record.id.to_string(),
            });
        }
        let mut stored = record.clone();
        stored.employee_name = None;
        attendance.insert(stored.id, stored);
        Ok(())
    }

    async fn delete_attendance(&self, id: Uuid) -> Result<()> {
        let mut attendance = self.attendance.write().await;
        if attendance.remove(&id).is_none() {
            return Err(RepositoryError::NotFound {
                entity_type: "AttendanceRecord",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    async fn delete_attendance_for_employee(&self, employee_id: &str) -> Result<u64> {
        let mut attendance = self.attendance.write().await;
        let before = attendance.len();
        attendance.retain(|_, r| r.employee_id != employee_id);
        Ok((before - attendance.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use sutra_core::hr::AttendanceStatus;

    fn employee(id: &str, email: &str, department: &str) -> Employee {
        Employee::new(id, format!("Name {}", id), email, department, "Engineer")
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, d).unwrap()
    }

    #[tokio::test]
    async fn test_employee_crud() {
        let repo = InMemoryRepository::new();
        let mut e = employee("EMP-1", "one@example.com", "HR");
        repo.create_employee(&e).await.unwrap();

        assert_eq!(repo.get_employee("EMP-1").await.unwrap(), Some(e.clone()));
        assert_eq!(
            repo.get_employee_by_email("one@example.com").await.unwrap(),
            Some(e.clone())
        );

        e.department = "Finance".to_string();
        repo.update_employee(&e).await.unwrap();
        assert_eq!(
            repo.get_employee("EMP-1").await.unwrap().unwrap().department,
            "Finance"
        );

        repo.delete_employee("EMP-1").await.unwrap();
        assert_eq!(repo.get_employee("EMP-1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_employee_uniqueness() {
        let repo = InMemoryRepository::new();
        repo.create_employee(&employee("EMP-1", "one@example.com", "HR"))
            .await
            .unwrap();

        let same_id = repo
            .create_employee(&employee("EMP-1", "other@example.com", "HR"))
            .await;
        assert!(matches!(same_id, Err(RepositoryError::AlreadyExists { .. })));

        let same_email = repo
            .create_employee(&employee("EMP-2", "one@example.com", "HR"))
            .await;
        assert!(matches!(same_email, Err(RepositoryError::AlreadyExists { .. })));
    }

    #[tokio::test]
    async fn test_update_rejects_email_owned_by_another() {
        let repo = InMemoryRepository::new();
        repo.create_employee(&employee("EMP-1", "one@example.com", "HR"))
            .await
            .unwrap();
        let mut two = employee("EMP-2", "two@example.com", "HR");
        repo.create_employee(&two).await.unwrap();

        two.email = "one@example.com".to_string();
        let result = repo.update_employee(&two).await;
        assert!(matches!(result, Err(RepositoryError::AlreadyExists { .. })));
    }

    #[tokio::test]
    async fn test_missing_employee_errors() {
        let repo = InMemoryRepository::new();
        let result = repo.delete_employee("EMP-404").await;
        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
        let result = repo
            .update_employee(&employee("EMP-404", "x@example.com", "HR"))
            .await;
        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_list_employees_newest_first_with_filters() {
        let repo = InMemoryRepository::new();
        let base = Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap();
        for (i, dept) in ["HR", "Engineering", "HR"].iter().enumerate() {
            let e = employee(&format!("EMP-{}", i), &format!("e{}@example.com", i), dept)
                .with_created_at(base + Duration::hours(i as i64));
            repo.create_employee(&e).await.unwrap();
        }

        let all = repo.list_employees(&EmployeeFilter::default()).await.unwrap();
        let ids: Vec<_> = all.iter().map(|e| e.employee_id.as_str()).collect();
        assert_eq!(ids, vec!["EMP-2", "EMP-1", "EMP-0"]);

        let hr = repo
            .list_employees(&EmployeeFilter {
                department: Some("HR".to_string()),
                search: None,
            })
            .await
            .unwrap();
        assert_eq!(hr.len(), 2);

        let searched = repo
            .list_employees(&EmployeeFilter {
                department: None,
                search: Some("emp-1".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(searched.len(), 1);
    }

    #[tokio::test]
    async fn test_department_counts() {
        let repo = InMemoryRepository::new();
        repo.create_employee(&employee("EMP-1", "a@example.com", "HR"))
            .await
            .unwrap();
        repo.create_employee(&employee("EMP-2", "b@example.com", "Engineering"))
            .await
            .unwrap();
        repo.create_employee(&employee("EMP-3", "c@example.com", "Engineering"))
            .await
            .unwrap();

        assert_eq!(repo.count_employees().await.unwrap(), 3);
        assert_eq!(
            repo.department_counts().await.unwrap(),
            vec![("Engineering".to_string(), 2), ("HR".to_string(), 1)]
        );
    }

    #[tokio::test]
    async fn test_attendance_unique_per_employee_and_date() {
        let repo = InMemoryRepository::new();
        let first = AttendanceRecord::new("EMP-1", date(7), AttendanceStatus::Present);
        repo.create_attendance(&first).await.unwrap();

        let duplicate = AttendanceRecord::new("EMP-1", date(7), AttendanceStatus::Absent);
        let result = repo.create_attendance(&duplicate).await;
        assert!(matches!(result, Err(RepositoryError::AlreadyExists { .. })));

        let other_day = AttendanceRecord::new("EMP-1", date(8), AttendanceStatus::Absent);
        repo.create_attendance(&other_day).await.unwrap();

        assert_eq!(
            repo.find_attendance("EMP-1", date(7)).await.unwrap(),
            Some(first)
        );
    }

    #[tokio::test]
    async fn test_attendance_list_count_and_cascade() {
        let repo = InMemoryRepository::new();
        for d in [3, 9, 5] {
            repo.create_attendance(&AttendanceRecord::new(
                "EMP-1",
                date(d),
                AttendanceStatus::Present,
            ))
            .await
            .unwrap();
        }
        repo.create_attendance(&AttendanceRecord::new(
            "EMP-2",
            date(5),
            AttendanceStatus::Absent,
        ))
        .await
        .unwrap();

        let listed = repo
            .list_attendance(&AttendanceFilter::for_employee("EMP-1"))
            .await
            .unwrap();
        let dates: Vec<_> = listed.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![date(9), date(5), date(3)]);

        let absent = AttendanceFilter::all().with_status(AttendanceStatus::Absent);
        assert_eq!(repo.count_attendance(&absent).await.unwrap(), 1);

        assert_eq!(repo.delete_attendance_for_employee("EMP-1").await.unwrap(), 3);
        assert_eq!(repo.count_attendance(&AttendanceFilter::all()).await.unwrap(), 1);
        assert_eq!(repo.delete_attendance_for_employee("EMP-1").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_stored_records_drop_employee_name() {
        let repo = InMemoryRepository::new();
        let mut record = AttendanceRecord::new("EMP-1", date(2), AttendanceStatus::Present);
        record.employee_name = Some("Asha Rao".to_string());
        repo.create_attendance(&record).await.unwrap();

        let stored = repo.get_attendance(record.id).await.unwrap().unwrap();
        assert_eq!(stored.employee_name, None);
    }
}
