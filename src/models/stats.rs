//! Dashboard aggregate counters.

use serde::{Deserialize, Serialize};

/// Six aggregate counters shown on the dashboard. Replaced wholesale on fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardStats {
    #[serde(alias = "totalUsers")]
    pub total_users: u64,
    #[serde(alias = "totalBranches")]
    pub total_branches: u64,
    #[serde(alias = "totalPatients")]
    pub total_patients: u64,
    #[serde(alias = "todayAppointments", alias = "todays_appointments")]
    pub today_appointments: u64,
    #[serde(alias = "monthlyRevenue")]
    pub monthly_revenue: f64,
    #[serde(alias = "activeStaff")]
    pub active_staff: u64,
}

/// Body of `GET /super-admin/dashboard-stats`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatsResponse {
    #[serde(default)]
    pub status: u16,
    #[serde(default)]
    pub data: DashboardStats,
}

impl StatsResponse {
    /// Only an in-body `status` of 200 counts as success.
    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_snake_case() {
        let json = r#"{"status": 200, "data": {
            "total_users": 12, "total_branches": 3, "total_patients": 840,
            "today_appointments": 27, "monthly_revenue": 125000.5, "active_staff": 64
        }}"#;
        let resp: StatsResponse = serde_json::from_str(json).unwrap();

        assert!(resp.is_success());
        assert_eq!(resp.data.total_patients, 840);
        assert_eq!(resp.data.monthly_revenue, 125000.5);
    }

    #[test]
    fn test_parse_camel_case_and_missing_fields() {
        let json = r#"{"status": 200, "data": {"totalUsers": 5, "activeStaff": 2}}"#;
        let resp: StatsResponse = serde_json::from_str(json).unwrap();

        assert_eq!(resp.data.total_users, 5);
        assert_eq!(resp.data.active_staff, 2);
        assert_eq!(resp.data.total_branches, 0);
    }

    #[test]
    fn test_non_200_is_not_success() {
        let resp: StatsResponse = serde_json::from_str(r#"{"status": 500}"#).unwrap();
        assert!(!resp.is_success());
        assert_eq!(resp.data, DashboardStats::default());
    }
}
