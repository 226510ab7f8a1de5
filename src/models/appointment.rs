//! Appointment records as returned by the appointment list endpoint.

use serde::{Deserialize, Deserializer, Serialize};

/// Appointment workflow status.
///
/// Unknown values are kept verbatim in `Other` so they can still be shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AppointmentStatus {
    Confirmed,
    Cancelled,
    PendingPayment,
    Other(String),
}

impl Default for AppointmentStatus {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for AppointmentStatus {
    fn from(raw: String) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "confirmed" => Self::Confirmed,
            "cancelled" | "canceled" => Self::Cancelled,
            "pending_payment" => Self::PendingPayment,
            _ => Self::Other(raw),
        }
    }
}

impl From<AppointmentStatus> for String {
    fn from(status: AppointmentStatus) -> Self {
        status.as_str().to_string()
    }
}

impl AppointmentStatus {
    /// Wire value of the status.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::PendingPayment => "pending_payment",
            Self::Other(raw) => raw,
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> String {
        label_or_unknown(self.as_str())
    }
}

/// Payment status of an appointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentStatus {
    Paid,
    Pending,
    Failed,
    Other(String),
}

impl Default for PaymentStatus {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for PaymentStatus {
    fn from(raw: String) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "paid" => Self::Paid,
            "pending" => Self::Pending,
            "failed" => Self::Failed,
            _ => Self::Other(raw),
        }
    }
}

impl From<PaymentStatus> for String {
    fn from(status: PaymentStatus) -> Self {
        status.as_str().to_string()
    }
}

impl PaymentStatus {
    /// Wire value of the status.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Paid => "paid",
            Self::Pending => "pending",
            Self::Failed => "failed",
            Self::Other(raw) => raw,
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> String {
        label_or_unknown(self.as_str())
    }
}

/// A single appointment row. Immutable snapshot from the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub patient_name: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub patient_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub doctor_name: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub doctor_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub branch_name: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub branch_id: String,
    #[serde(default, alias = "appointment_date", deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(default, alias = "appointment_time", deserialize_with = "null_as_default")]
    pub time: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: AppointmentStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub queue_number: Option<u32>,
}

/// Body of `GET /super-admin/appointment-list`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppointmentList {
    #[serde(default)]
    pub appointments: Vec<AppointmentRecord>,
    #[serde(default)]
    pub count: u64,
}

/// Treat JSON `null` like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accept ids sent either as JSON strings or numbers.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
        Null(()),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Int(n) => n.to_string(),
        Raw::Float(n) => n.to_string(),
        Raw::Null(()) => String::new(),
    })
}

/// Label for a status; blank statuses read as "Unknown".
fn label_or_unknown(raw: &str) -> String {
    let label = humanize(raw);
    if label.is_empty() { "Unknown".to_string() } else { label }
}

/// `pending_payment` -> `Pending Payment`
fn humanize(raw: &str) -> String {
    raw.split(['_', ' '])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
