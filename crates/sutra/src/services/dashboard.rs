//! Dashboard service.
//!
//! Aggregates are never written directly. Employee and attendance writes
//! drop `dashboard:*`, and the next read recomputes.

use std::sync::Arc;

use tracing::trace;

use sutra_core::cache::{
    dashboard_attendance_summary_key, dashboard_summary_key, ATTENDANCE_SUMMARY_TTL,
    DASHBOARD_SUMMARY_TTL,
};
use sutra_core::hr::{
    build_attendance_summary, sort_summaries, AttendanceStatus, DashboardSummary,
    EmployeeAttendanceSummary,
};
use sutra_core::storage::{
    AttendanceFilter, AttendanceRepository, EmployeeFilter, EmployeeRepository,
};

use super::{today, ServiceResult};
use crate::cache::CacheStore;

#[derive(Clone)]
pub struct DashboardService {
    employees: Arc<dyn EmployeeRepository>,
    attendance: Arc<dyn AttendanceRepository>,
    cache: Arc<CacheStore>,
}

impl DashboardService {
    pub fn new(
        employees: Arc<dyn EmployeeRepository>,
        attendance: Arc<dyn AttendanceRepository>,
        cache: Arc<CacheStore>,
    ) -> Self {
        Self {
            employees,
            attendance,
            cache,
        }
    }

    /// Headcount, today's present/absent counts, and employees per department.
    pub async fn summary(&self) -> ServiceResult<DashboardSummary> {
        let cache_key = dashboard_summary_key();

        if let Some(summary) = self.cache.get_json::<DashboardSummary>(&cache_key).await {
            return Ok(summary);
        }

        trace!("Cache miss for dashboard summary");
        let today = today();
        let total_employees = self.employees.count_employees().await?;
        let present_today = self
            .attendance
            .count_attendance(
                &AttendanceFilter::all()
                    .on_date(today)
                    .with_status(AttendanceStatus::Present),
            )
            .await?;
        let absent_today = self
            .attendance
            .count_attendance(
                &AttendanceFilter::all()
                    .on_date(today)
                    .with_status(AttendanceStatus::Absent),
            )
            .await?;
        let department_counts = self
            .employees
            .department_counts()
            .await?
            .into_iter()
            .collect();

        let summary = DashboardSummary {
            total_employees,
            present_today,
            absent_today,
            department_counts,
        };

        self.cache
            .set_json(&cache_key, &summary, DASHBOARD_SUMMARY_TTL)
            .await;

        Ok(summary)
    }

    /// Per-employee attendance totals, best attendance first.
    pub async fn attendance_summary(&self) -> ServiceResult<Vec<EmployeeAttendanceSummary>> {
        let cache_key = dashboard_attendance_summary_key();

        if let Some(summaries) = self
            .cache
            .get_json::<Vec<EmployeeAttendanceSummary>>(&cache_key)
            .await
        {
            return Ok(summaries);
        }

        trace!("Cache miss for attendance summary");
        let employees = self
            .employees
            .list_employees(&EmployeeFilter::default())
            .await?;

        let mut summaries = Vec::with_capacity(employees.len());
        for employee in &employees {
            let filter = AttendanceFilter::for_employee(employee.employee_id.clone());
            let present = self
                .attendance
                .count_attendance(&filter.clone().with_status(AttendanceStatus::Present))
                .await?;
            let absent = self
                .attendance
                .count_attendance(&filter.with_status(AttendanceStatus::Absent))
                .await?;
            summaries.push(build_attendance_summary(employee, present, absent));
        }
        sort_summaries(&mut summaries);

        self.cache
            .set_json(&cache_key, &summaries, ATTENDANCE_SUMMARY_TTL)
            .await;

        Ok(summaries)
    }
}
