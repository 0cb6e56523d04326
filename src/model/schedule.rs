//! Viewing-schedule model
//!
//! A schedule is a viewing-appointment record with a status field, peripheral
//! to the property core. Status moves through a fixed set of transitions;
//! anything else is rejected.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::core::error::ScheduleError;

/// Lifecycle of a viewing appointment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl ScheduleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleStatus::Pending => "pending",
            ScheduleStatus::Confirmed => "confirmed",
            ScheduleStatus::Cancelled => "cancelled",
            ScheduleStatus::Completed => "completed",
        }
    }

    /// Permitted transitions: pending→confirmed, pending→cancelled,
    /// confirmed→completed.
    pub fn can_transition(&self, to: ScheduleStatus) -> bool {
        matches!(
            (self, to),
            (ScheduleStatus::Pending, ScheduleStatus::Confirmed)
                | (ScheduleStatus::Pending, ScheduleStatus::Cancelled)
                | (ScheduleStatus::Confirmed, ScheduleStatus::Completed)
        )
    }
}

impl fmt::Display for ScheduleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A viewing appointment for a property
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub id: Uuid,
    pub property_title: String,
    pub property_address: String,
    pub user_name: String,
    pub user_email: String,
    pub scheduled_date: DateTime<Utc>,
    pub contact_method: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: ScheduleStatus,
    pub created_at: DateTime<Utc>,
}

impl Schedule {
    pub fn from_new(new: NewSchedule) -> Self {
        Self {
            id: Uuid::new_v4(),
            property_title: new.property_title,
            property_address: new.property_address,
            user_name: new.user_name,
            user_email: new.user_email,
            scheduled_date: new.scheduled_date,
            contact_method: new.contact_method,
            message: new.message,
            status: ScheduleStatus::Pending,
            created_at: Utc::now(),
        }
    }

    /// Move to a new status, enforcing permitted transitions
    pub fn transition(&mut self, to: ScheduleStatus) -> Result<(), ScheduleError> {
        if !self.status.can_transition(to) {
            return Err(ScheduleError::InvalidTransition {
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }
}

/// Booking payload for a viewing appointment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSchedule {
    pub property_title: String,
    pub property_address: String,
    pub user_name: String,
    pub user_email: String,
    pub scheduled_date: DateTime<Utc>,
    pub contact_method: String,
    #[serde(default)]
    pub message: String,
}
