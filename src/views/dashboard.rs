//! Dashboard statistics view state.

use crate::error::AppError;
use crate::loader::{Loader, RequestToken};
use crate::models::{DashboardStats, StatsResponse, UserIdentity};

/// One rendered counter card.
#[derive(Debug, Clone, PartialEq)]
pub struct StatCard {
    pub title: &'static str,
    pub value: String,
    pub caption: &'static str,
}

/// State behind the dashboard panel.
#[derive(Debug, Default)]
pub struct DashboardStatsView {
    loader: Loader<()>,
    stats: DashboardStats,
    identity: UserIdentity,
}

impl DashboardStatsView {
    pub fn new(identity: UserIdentity) -> Self {
        Self {
            loader: Loader::new(),
            stats: DashboardStats::default(),
            identity,
        }
    }

    pub fn begin_load(&mut self) -> RequestToken {
        self.loader.begin()
    }

    pub fn track(&mut self, handle: tokio::task::AbortHandle) {
        self.loader.track(handle);
    }

    /// Apply a fetch outcome.
    ///
    /// Only a response whose in-body status is 200 replaces the counters;
    /// anything else keeps what was shown before. Returns `false` for stale
    /// responses.
    pub fn apply(&mut self, token: RequestToken, result: Result<StatsResponse, AppError>) -> bool {
        if !self.loader.is_current(token) {
            tracing::debug!("Discarding stale dashboard stats response");
            return false;
        }

        match result {
            Ok(resp) if resp.is_success() => self.stats = resp.data,
            Ok(resp) => tracing::debug!("Ignoring dashboard stats with status {}", resp.status),
            Err(e) => tracing::error!("Error fetching dashboard stats: {e}"),
        }
        self.loader.complete(token, Ok(()))
    }

    /// Counters currently shown (zero until a successful load).
    pub fn stats(&self) -> DashboardStats {
        self.stats
    }

    /// Gates skeleton cards.
    pub fn is_loading(&self) -> bool {
        self.loader.is_loading()
    }

    pub fn identity(&self) -> &UserIdentity {
        &self.identity
    }

    pub fn set_identity(&mut self, identity: UserIdentity) {
        self.identity = identity;
    }

    /// Greeting line for the header.
    pub fn greeting(&self) -> String {
        let name = self.identity.display_name();
        if name.is_empty() {
            "Welcome back".to_string()
        } else {
            format!("Welcome back, {name}")
        }
    }

    /// The six counter cards in display order.
    pub fn cards(&self) -> Vec<StatCard> {
        let stats = self.stats();
        vec![
            StatCard {
                title: "Total Users",
                value: stats.total_users.to_string(),
                caption: "Registered accounts",
            },
            StatCard {
                title: "Branches",
                value: stats.total_branches.to_string(),
                caption: "Hospital locations",
            },
            StatCard {
                title: "Patients",
                value: stats.total_patients.to_string(),
                caption: "Registered patients",
            },
            StatCard {
                title: "Today's Appointments",
                value: stats.today_appointments.to_string(),
                caption: "Scheduled for today",
            },
            StatCard {
                title: "Monthly Revenue",
                value: format!("{:.2}", stats.monthly_revenue),
                caption: "This month",
            },
            StatCard {
                title: "Active Staff",
                value: stats.active_staff.to_string(),
                caption: "Currently on roll",
            },
        ]
    }
}
