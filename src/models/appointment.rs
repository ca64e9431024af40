use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub const DEFAULT_COMPLETION_NOTE: &str = "Service completed";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub vehicle_ref: String,
    pub departure_at: NaiveDateTime,
    pub return_at: NaiveDateTime,
    pub destination: String,
    pub reason: String,
    pub status: AppointmentStatus,
    pub owner_ref: String,
    pub completion_note: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::InProgress => "in_progress",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "in_progress" => AppointmentStatus::InProgress,
            "completed" => AppointmentStatus::Completed,
            "cancelled" => AppointmentStatus::Cancelled,
            _ => AppointmentStatus::Scheduled,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AppointmentStatus::Completed | AppointmentStatus::Cancelled
        )
    }
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("cannot move appointment from {} to {}", from.as_str(), requested.as_str())]
pub struct TransitionError {
    pub from: AppointmentStatus,
    pub requested: AppointmentStatus,
}

impl Appointment {
    /// Scheduled -> InProgress. The vehicle leaves the yard.
    pub fn start(&mut self) -> Result<(), TransitionError> {
        match self.status {
            AppointmentStatus::Scheduled => {
                self.status = AppointmentStatus::InProgress;
                Ok(())
            }
            from => Err(TransitionError {
                from,
                requested: AppointmentStatus::InProgress,
            }),
        }
    }

    /// InProgress -> Completed, recording a completion note.
    pub fn finish(&mut self, note: Option<&str>) -> Result<(), TransitionError> {
        match self.status {
            AppointmentStatus::InProgress => {
                self.status = AppointmentStatus::Completed;
                self.completion_note = Some(
                    note.map(str::trim)
                        .filter(|n| !n.is_empty())
                        .unwrap_or(DEFAULT_COMPLETION_NOTE)
                        .to_string(),
                );
                Ok(())
            }
            from => Err(TransitionError {
                from,
                requested: AppointmentStatus::Completed,
            }),
        }
    }

    /// Scheduled -> Cancelled. An appointment already in progress cannot be
    /// cancelled, only finished.
    pub fn cancel(&mut self) -> Result<(), TransitionError> {
        match self.status {
            AppointmentStatus::Scheduled => {
                self.status = AppointmentStatus::Cancelled;
                Ok(())
            }
            from => Err(TransitionError {
                from,
                requested: AppointmentStatus::Cancelled,
            }),
        }
    }
}
