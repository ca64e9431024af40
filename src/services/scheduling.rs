use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub const MIN_DESTINATION_LEN: usize = 5;
pub const MIN_REASON_LEN: usize = 10;

/// Candidate appointment as submitted by the front-end form. Timestamps are
/// optional because a half-filled form is still validated as a whole.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppointmentDraft {
    pub vehicle_ref: String,
    pub departure_at: Option<NaiveDateTime>,
    pub return_at: Option<NaiveDateTime>,
    pub destination: String,
    pub reason: String,
}

/// Field-keyed validation messages. Empty means the draft is acceptable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors(pub BTreeMap<&'static str, String>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    fn add(&mut self, field: &'static str, message: &str) {
        self.0.insert(field, message.to_string());
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// Validate a draft against the scheduling rules. Every rule runs; the
/// caller gets all problems at once rather than one per submission.
pub fn validate(draft: &AppointmentDraft, now: NaiveDateTime) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    if draft.vehicle_ref.trim().is_empty() {
        errors.add("vehicle", "select a vehicle");
    }

    match draft.departure_at {
        Some(departure) if departure > now => {}
        Some(_) => errors.add("departure_at", "departure must be in the future"),
        None => errors.add("departure_at", "departure date and time are required"),
    }

    // Checked against whatever departure value is present, valid or not.
    match (draft.return_at, draft.departure_at) {
        (Some(ret), Some(departure)) if ret > departure => {}
        (Some(_), Some(_)) => errors.add("return_at", "return must be after departure"),
        (Some(_), None) => {}
        (None, _) => errors.add("return_at", "return date and time are required"),
    }

    if draft.destination.trim().chars().count() < MIN_DESTINATION_LEN {
        errors.add("destination", "destination must be at least 5 characters");
    }

    if draft.reason.trim().chars().count() < MIN_REASON_LEN {
        errors.add("reason", "reason must be at least 10 characters");
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn now() -> NaiveDateTime {
        dt("2025-06-16 12:00")
    }

    fn valid_draft() -> AppointmentDraft {
        AppointmentDraft {
            vehicle_ref: "ABC-1234".to_string(),
            departure_at: Some(dt("2025-06-17 09:00")),
            return_at: Some(dt("2025-06-17 18:00")),
            destination: "Av. Paulista".to_string(),
            reason: "Client technical visit".to_string(),
        }
    }

    #[test]
    fn test_valid_draft_passes() {
        let errors = validate(&valid_draft(), now());
        assert!(errors.is_empty(), "unexpected errors: {errors}");
    }

    #[test]
    fn test_all_rules_reported_at_once() {
        let draft = AppointmentDraft {
            vehicle_ref: "".to_string(),
            departure_at: Some(dt("2025-06-15 09:00")),
            return_at: Some(dt("2025-06-15 08:00")),
            destination: "ab".to_string(),
            reason: "short".to_string(),
        };
        let errors = validate(&draft, now());
        assert_eq!(errors.len(), 5);
        for field in ["vehicle", "departure_at", "return_at", "destination", "reason"] {
            assert!(errors.0.contains_key(field), "missing error for {field}");
        }
    }

    #[test]
    fn test_empty_draft_reports_every_field() {
        let errors = validate(&AppointmentDraft::default(), now());
        assert_eq!(errors.len(), 5);
    }

    #[test]
    fn test_whitespace_vehicle_is_missing() {
        let mut draft = valid_draft();
        draft.vehicle_ref = "   ".to_string();
        let errors = validate(&draft, now());
        assert!(errors.0.contains_key("vehicle"));
    }

    #[test]
    fn test_departure_exactly_now_rejected() {
        let mut draft = valid_draft();
        draft.departure_at = Some(now());
        let errors = validate(&draft, now());
        assert!(errors.0.contains_key("departure_at"));
    }

    #[test]
    fn test_return_equal_to_departure_rejected() {
        let mut draft = valid_draft();
        draft.return_at = draft.departure_at;
        let errors = validate(&draft, now());
        assert_eq!(errors.len(), 1);
        assert!(errors.0.contains_key("return_at"));
    }

    #[test]
    fn test_return_checked_even_with_past_departure() {
        // Departure is invalid (in the past) but the return rule still runs
        // against it, so a return after that departure is not flagged.
        let mut draft = valid_draft();
        draft.departure_at = Some(now() - Duration::days(1));
        draft.return_at = Some(now() - Duration::hours(12));
        let errors = validate(&draft, now());
        assert!(errors.0.contains_key("departure_at"));
        assert!(!errors.0.contains_key("return_at"));
    }

    #[test]
    fn test_destination_trimmed_length() {
        let mut draft = valid_draft();
        draft.destination = "  abcd  ".to_string();
        let errors = validate(&draft, now());
        assert!(errors.0.contains_key("destination"));

        draft.destination = "  abcde  ".to_string();
        assert!(validate(&draft, now()).is_empty());
    }

    #[test]
    fn test_reason_trimmed_length() {
        let mut draft = valid_draft();
        draft.reason = " nine char ".to_string(); // 9 after trim
        let errors = validate(&draft, now());
        assert!(errors.0.contains_key("reason"));

        draft.reason = "ten chars!".to_string();
        assert!(validate(&draft, now()).is_empty());
    }
}
