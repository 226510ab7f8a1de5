//! Appointment list view state.

use crate::error::AppError;
use crate::loader::{LoadState, Loader, RequestToken};
use crate::models::{AppointmentList, AppointmentRecord, AppointmentStatus, PaymentStatus};

/// User-facing message for any failed load.
pub const LOAD_ERROR_MESSAGE: &str = "Failed to load appointments. Please try again.";
/// Shown when the loaded list is empty.
pub const EMPTY_MESSAGE: &str = "No appointments found";

/// Color classification for status badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Success,
    Warning,
    Danger,
    Neutral,
}

/// Badge class for an appointment status. Unknown values are neutral.
pub fn status_class(status: &AppointmentStatus) -> StatusClass {
    match status {
        AppointmentStatus::Confirmed => StatusClass::Success,
        AppointmentStatus::PendingPayment => StatusClass::Warning,
        AppointmentStatus::Cancelled => StatusClass::Danger,
        AppointmentStatus::Other(_) => StatusClass::Neutral,
    }
}

/// Badge class for a payment status. Unknown values are neutral.
pub fn payment_class(status: &PaymentStatus) -> StatusClass {
    match status {
        PaymentStatus::Paid => StatusClass::Success,
        PaymentStatus::Pending => StatusClass::Warning,
        PaymentStatus::Failed => StatusClass::Danger,
        PaymentStatus::Other(_) => StatusClass::Neutral,
    }
}

/// State behind the appointments panel.
#[derive(Debug, Default)]
pub struct AppointmentListView {
    loader: Loader<AppointmentList>,
}

impl AppointmentListView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a (re)load. Clears any previous error.
    pub fn begin_refresh(&mut self) -> RequestToken {
        self.loader.begin()
    }

    /// Record the spawned fetch so a later refresh can cancel it.
    pub fn track(&mut self, handle: tokio::task::AbortHandle) {
        self.loader.track(handle);
    }

    /// Apply a fetch outcome. Returns `false` for stale responses.
    pub fn apply(&mut self, token: RequestToken, result: Result<AppointmentList, AppError>) -> bool {
        if !self.loader.is_current(token) {
            tracing::debug!("Discarding stale appointment list response");
            return false;
        }

        let outcome = result.map_err(|e| {
            tracing::error!("Failed to load appointments: {e}");
            LOAD_ERROR_MESSAGE.to_string()
        });
        self.loader.complete(token, outcome)
    }

    pub fn state(&self) -> &LoadState<AppointmentList> {
        self.loader.state()
    }

    pub fn is_loading(&self) -> bool {
        self.loader.is_loading()
    }

    pub fn error(&self) -> Option<&str> {
        self.loader.error()
    }

    /// Rows to render; empty unless loaded.
    pub fn rows(&self) -> &[AppointmentRecord] {
        self.loader
            .data()
            .map(|list| list.appointments.as_slice())
            .unwrap_or(&[])
    }

    /// Count reported by the server, 0 unless loaded.
    pub fn total(&self) -> u64 {
        self.loader.data().map(|list| list.count).unwrap_or(0)
    }

    /// Footer line, e.g. "Total Appointments: 12".
    pub fn summary(&self) -> String {
        format!("Total Appointments: {}", self.total())
    }

    /// Message for an empty table, if the table is empty and nothing is pending.
    pub fn empty_message(&self) -> Option<&'static str> {
        (!self.is_loading() && self.rows().is_empty()).then_some(EMPTY_MESSAGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, status: &str, payment: &str) -> AppointmentRecord {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "patient_name": "Patient",
            "status": status,
            "payment_status": payment,
        }))
        .unwrap()
    }

    #[test]
    fn test_known_status_classes() {
        assert_eq!(status_class(&AppointmentStatus::Confirmed), StatusClass::Success);
        assert_eq!(status_class(&AppointmentStatus::Cancelled), StatusClass::Danger);
        assert_eq!(status_class(&AppointmentStatus::PendingPayment), StatusClass::Warning);
        assert_eq!(payment_class(&PaymentStatus::Paid), StatusClass::Success);
        assert_eq!(payment_class(&PaymentStatus::Pending), StatusClass::Warning);
        assert_eq!(payment_class(&PaymentStatus::Failed), StatusClass::Danger);
    }

    #[test]
    fn test_unknown_status_is_neutral() {
        for raw in ["rescheduled", "no_show", "", "CHECKED-IN", "completed"] {
            let status = AppointmentStatus::from(raw.to_string());
            assert_eq!(status_class(&status), StatusClass::Neutral, "status {raw:?}");

            let payment = PaymentStatus::from(raw.to_string());
            assert_eq!(payment_class(&payment), StatusClass::Neutral, "payment {raw:?}");
        }
    }

    #[test]
    fn test_null_status_row_renders_neutral() {
        let list: AppointmentList = serde_json::from_value(serde_json::json!({
            "appointments": [
                {"id": 1, "patient_name": "Asha", "status": "confirmed", "payment_status": "paid"},
                {"id": 2, "patient_name": "Ravi", "status": null, "payment_status": null, "date": null},
            ],
            "count": 2,
        }))
        .unwrap();

        let mut view = AppointmentListView::new();
        let token = view.begin_refresh();
        assert!(view.apply(token, Ok(list)));

        assert!(view.error().is_none());
        assert_eq!(view.rows().len(), 2);
        let row = &view.rows()[1];
        assert_eq!(status_class(&row.status), StatusClass::Neutral);
        assert_eq!(payment_class(&row.payment_status), StatusClass::Neutral);
    }

    #[test]
    fn test_stale_failure_is_ignored() {
        let mut view = AppointmentListView::new();
        let stale = view.begin_refresh();
        let _current = view.begin_refresh();

        assert!(!view.apply(stale, Err(AppError::parse("late"))));
        assert!(view.is_loading());
        assert!(view.error().is_none());
    }

    #[test]
    fn test_empty_response_rendering() {
        let mut view = AppointmentListView::new();
        let token = view.begin_refresh();
        view.apply(
            token,
            Ok(AppointmentList {
                appointments: Vec::new(),
                count: 0,
            }),
        );

        assert_eq!(view.empty_message(), Some("No appointments found"));
        assert_eq!(view.summary(), "Total Appointments: 0");
    }

    #[test]
    fn test_failure_shows_error_and_empty_table() {
        let mut view = AppointmentListView::new();
        let token = view.begin_refresh();
        view.apply(token, Err(AppError::parse("bad body")));

        assert_eq!(view.error(), Some(LOAD_ERROR_MESSAGE));
        assert!(!view.is_loading());
        assert!(view.rows().is_empty());
        assert_eq!(view.total(), 0);
    }

    #[test]
    fn test_refresh_after_failure_resets_error() {
        let mut view = AppointmentListView::new();
        let token = view.begin_refresh();
        view.apply(token, Err(AppError::not_found("gone")));

        let token = view.begin_refresh();
        assert!(view.is_loading());
        assert!(view.error().is_none());

        view.apply(
            token,
            Ok(AppointmentList {
                appointments: vec![record("1", "confirmed", "paid"), record("2", "cancelled", "failed")],
                count: 2,
            }),
        );
        assert_eq!(view.rows().len(), 2);
        assert_eq!(view.summary(), "Total Appointments: 2");
        assert_eq!(view.empty_message(), None);
    }

    #[test]
    fn test_overlapping_refresh_keeps_latest() {
        let mut view = AppointmentListView::new();
        let slow = view.begin_refresh();
        let fast = view.begin_refresh();

        view.apply(
            fast,
            Ok(AppointmentList {
                appointments: vec![record("new", "confirmed", "paid")],
                count: 1,
            }),
        );
        let applied = view.apply(slow, Err(AppError::parse("late failure")));

        assert!(!applied);
        assert!(view.error().is_none());
        assert_eq!(view.rows()[0].id, "new");
    }

    #[test]
    fn test_loading_has_no_empty_message() {
        let mut view = AppointmentListView::new();
        view.begin_refresh();
        assert_eq!(view.empty_message(), None);
    }
}
