//! Built-in settings catalog and branch directory.

use chrono::{NaiveDate, NaiveTime};
use egui_phosphor::regular::{BELL, BUILDINGS, CALENDAR_CHECK, CREDIT_CARD, GEAR, LOCK, SHIELD_CHECK};

use crate::models::{Branch, SettingCategory, SettingItem};

fn category(
    id: &str,
    title: &str,
    description: &str,
    icon: &str,
    accent: [u8; 3],
    items: Vec<SettingItem>,
) -> SettingCategory {
    SettingCategory {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        icon: icon.to_string(),
        accent,
        items,
    }
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default()
}

/// Default configuration categories, in display order.
pub fn default_categories() -> Vec<SettingCategory> {
    vec![
        category(
            "general",
            "General",
            "Hospital identity, locale and maintenance",
            GEAR,
            [66, 133, 244],
            vec![
                SettingItem::text("hospital_name", "Hospital Name", "City Care Hospital"),
                SettingItem::select(
                    "timezone",
                    "Time Zone",
                    "Asia/Kolkata",
                    &["Asia/Kolkata", "Asia/Dubai", "Europe/London", "UTC"],
                ),
                SettingItem::select(
                    "date_format",
                    "Date Format",
                    "DD/MM/YYYY",
                    &["DD/MM/YYYY", "MM/DD/YYYY", "YYYY-MM-DD"],
                ),
                SettingItem::select(
                    "language",
                    "Default Language",
                    "English",
                    &["English", "Hindi", "Marathi", "Arabic"],
                ),
                SettingItem::toggle("maintenance_mode", "Maintenance Mode", false)
                    .with_help("Blocks sign-in for everyone except super admins"),
            ],
        ),
        category(
            "appointments",
            "Appointments",
            "Booking rules, slots and queue numbering",
            CALENDAR_CHECK,
            [52, 168, 83],
            vec![
                SettingItem::number("slot_duration", "Slot Duration (minutes)", 15.0),
                SettingItem::number("max_daily_per_doctor", "Max Daily Appointments per Doctor", 40.0),
                SettingItem::toggle("online_booking", "Allow Online Booking", true),
                SettingItem::number("cancellation_window", "Cancellation Window (hours)", 4.0)
                    .with_help("Patients cannot cancel closer to the slot than this"),
                SettingItem::select(
                    "queue_numbering",
                    "Queue Numbering",
                    "daily_reset",
                    &["daily_reset", "continuous"],
                ),
                SettingItem::time("opening_time", "OPD Opening Time", hm(8, 0)),
                SettingItem::time("closing_time", "OPD Closing Time", hm(20, 0)),
            ],
        ),
        category(
            "billing",
            "Billing & Payments",
            "Currency, taxes, invoices and payment gateway",
            CREDIT_CARD,
            [251, 188, 5],
            vec![
                SettingItem::select("currency", "Currency", "INR", &["INR", "USD", "AED", "GBP"]),
                SettingItem::number("tax_rate", "Tax Rate (%)", 18.0),
                SettingItem::text("invoice_prefix", "Invoice Prefix", "INV-"),
                SettingItem::toggle("payment_gateway", "Online Payment Gateway", true),
                SettingItem::date(
                    "fiscal_year_start",
                    "Fiscal Year Start",
                    NaiveDate::from_ymd_opt(2025, 4, 1).unwrap_or_default(),
                ),
                SettingItem::textarea("invoice_footer", "Invoice Footer Note", "Thank you for choosing City Care."),
            ],
        ),
        category(
            "insurance",
            "Insurance & TPA",
            "Third-party administrators and claim handling",
            SHIELD_CHECK,
            [171, 71, 188],
            vec![
                SettingItem::toggle("tpa_enabled", "Enable TPA Claims", true),
                SettingItem::select(
                    "default_tpa",
                    "Default TPA",
                    "None",
                    &["None", "MediAssist", "Paramount", "Vidal Health"],
                ),
                SettingItem::number("claim_deadline_days", "Claim Submission Deadline (days)", 30.0),
                SettingItem::toggle("cashless", "Cashless Admission", false)
                    .with_help("Requires pre-authorisation from the TPA"),
            ],
        ),
        category(
            "notifications",
            "Notifications",
            "Appointment reminders over SMS and email",
            BELL,
            [0, 172, 193],
            vec![
                SettingItem::toggle("sms_reminders", "SMS Reminders", true),
                SettingItem::toggle("email_reminders", "Email Reminders", true),
                SettingItem::number("reminder_lead_hours", "Reminder Lead Time (hours)", 24.0),
                SettingItem::textarea(
                    "reminder_template",
                    "Reminder Template",
                    "Dear {patient}, your appointment with {doctor} is on {date} at {time}.",
                ),
            ],
        ),
        category(
            "security",
            "Security & Access",
            "Sessions, passwords and two-factor authentication",
            LOCK,
            [234, 67, 53],
            vec![
                SettingItem::number("session_timeout", "Session Timeout (minutes)", 30.0),
                SettingItem::number("password_expiry", "Password Expiry (days)", 90.0),
                SettingItem::toggle("two_factor", "Require Two-Factor Authentication", false),
                SettingItem::select(
                    "audit_retention",
                    "Audit Log Retention",
                    "1 year",
                    &["90 days", "1 year", "3 years", "7 years"],
                ),
            ],
        ),
        category(
            "branches",
            "Branch Operations",
            "Defaults applied to newly opened branches",
            BUILDINGS,
            [120, 144, 156],
            vec![
                SettingItem::text("branch_code_prefix", "Branch Code Prefix", "CCH"),
                SettingItem::toggle("shared_pharmacy", "Shared Pharmacy Inventory", false),
                SettingItem::toggle("cross_branch_records", "Cross-Branch Patient Records", true),
            ],
        ),
    ]
}

/// Fixed branch list used when no branch endpoint is configured.
pub fn default_branches() -> Vec<Branch> {
    [
        ("1", "Main Hospital", "Pune"),
        ("2", "North Clinic", "Nashik"),
        ("3", "Eastside Diagnostics", "Aurangabad"),
    ]
    .into_iter()
    .map(|(id, name, location)| Branch {
        id: id.to_string(),
        name: name.to_string(),
        location: location.to_string(),
    })
    .collect()
}
