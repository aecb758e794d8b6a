//! Worker model and related types.
//!
//! This module defines the Worker struct and Role enum for representing
//! the people who clock in and out, and the managers who oversee them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The role a worker holds in the organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// A care worker who clocks shifts.
    #[serde(alias = "careworker")]
    CareWorker,
    /// A manager who configures the perimeter and reviews attendance.
    Manager,
}

impl Role {
    /// Parses a role as supplied by the identity provider.
    ///
    /// Accepts `careworker`, `care_worker` and `manager`, case-insensitively.
    ///
    /// # Examples
    ///
    /// ```
    /// use attendance_engine::models::Role;
    ///
    /// assert_eq!(Role::parse("Manager"), Some(Role::Manager));
    /// assert_eq!(Role::parse("careworker"), Some(Role::CareWorker));
    /// assert_eq!(Role::parse("admin"), None);
    /// ```
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "careworker" | "care_worker" => Some(Role::CareWorker),
            "manager" => Some(Role::Manager),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::CareWorker => write!(f, "careworker"),
            Role::Manager => write!(f, "manager"),
        }
    }
}

/// Represents a registered worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worker {
    /// Unique identifier for the worker.
    pub id: String,
    /// The name shown in logs and summaries.
    pub display_name: String,
    /// The worker's role.
    pub role: Role,
}
