//! crates/course_catalog_core/src/domain.rs
//!
//! Defines the core data structures for the catalog: courses, accounts, the
//! session projection and enrollments, plus the read-only projections built
//! from them. Field names serialize in camelCase to match the stored layout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::CatalogError;

/// Shortest password accepted at registration.
pub const MIN_PASSWORD_LENGTH: usize = 6;

//=========================================================================================
// Catalog
//=========================================================================================

/// A single lesson, owned by its parent course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: String,
    pub title: String,
    /// Length in seconds.
    pub duration: u32,
    #[serde(default)]
    pub url: String,
}

impl Lesson {
    pub fn duration_minutes(&self) -> u32 {
        (f64::from(self.duration) / 60.0).round() as u32
    }
}

/// A course in the catalog. `id` is used for relations, `slug` for addressing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    pub level: String,
    pub price: f64,
    pub instructor: String,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

impl Course {
    pub fn is_free(&self) -> bool {
        self.price == 0.0
    }

    /// Display label for the price, e.g. `Free` or `₹9.99`.
    pub fn price_label(&self) -> String {
        if self.is_free() {
            "Free".to_string()
        } else {
            format!("₹{}", self.price)
        }
    }

    pub fn enroll_label(&self) -> &'static str {
        if self.is_free() {
            "Enroll for Free"
        } else {
            "Enroll"
        }
    }

    pub fn lesson(&self, lesson_id: &str) -> Option<&Lesson> {
        self.lessons.iter().find(|l| l.id == lesson_id)
    }
}

/// Criteria for narrowing the catalog. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogFilter {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub level: String,
}

//=========================================================================================
// Accounts and Session
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Instructor,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Student => f.write_str("student"),
            Role::Instructor => f.write_str("instructor"),
        }
    }
}

impl FromStr for Role {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "student" => Ok(Role::Student),
            "instructor" => Ok(Role::Instructor),
            other => Err(CatalogError::Validation(format!("Unknown role '{}'", other))),
        }
    }
}

/// A registered account. `password` holds whatever the credential verifier sealed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl Account {
    /// Builds an account from raw registration input.
    ///
    /// Trims the name, trims and lowercases the email, and enforces the minimum
    /// password length, counted in UTF-16 code units. The password is stored exactly as given here; callers
    /// seal it with a `CredentialVerifier` before persisting.
    pub fn new(name: &str, email: &str, password: &str, role: Role) -> Result<Self, CatalogError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CatalogError::Validation("Name is required".to_string()));
        }
        let email = normalize_email(email);
        if email.is_empty() {
            return Err(CatalogError::Validation("Email is required".to_string()));
        }
        if password.encode_utf16().count() < MIN_PASSWORD_LENGTH {
            return Err(CatalogError::Validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }
        Ok(Self {
            name: name.to_string(),
            email,
            password: password.to_string(),
            role,
        })
    }

    /// The public projection stored as the current session.
    pub fn to_session(&self) -> SessionUser {
        SessionUser {
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }
}

/// The logged-in user. Never carries the password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub name: String,
    pub email: String,
    pub role: Role,
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

//=========================================================================================
// Enrollment
//=========================================================================================

/// Links a user (by email) to a course. One per (user, course) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub user_id: String,
    pub course_id: String,
    pub enrolled_at: DateTime<Utc>,
    /// Lesson id to completion marker. Markers are opaque; only the key count is read.
    #[serde(default)]
    pub progress: BTreeMap<String, serde_json::Value>,
}

impl Enrollment {
    pub fn new(user_id: &str, course_id: &str, enrolled_at: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.to_string(),
            course_id: course_id.to_string(),
            enrolled_at,
            progress: BTreeMap::new(),
        }
    }

    pub fn matches(&self, user_id: &str, course_id: &str) -> bool {
        self.user_id == user_id && self.course_id == course_id
    }

    /// Completed share of `lesson_count`, rounded to a whole percent.
    pub fn progress_percent(&self, lesson_count: usize) -> u32 {
        let done = self.progress.len() as f64;
        let total = lesson_count.max(1) as f64;
        (done / total * 100.0).round() as u32
    }
}

//=========================================================================================
// Projections
//=========================================================================================

/// One dashboard row: an enrollment joined with its course.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardEntry {
    pub course: Course,
    pub enrolled_at: DateTime<Utc>,
    pub progress_percent: u32,
}

/// Result of the dashboard projection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Dashboard {
    /// No session; the caller should send the user to login.
    LoginRequired,
    Ready {
        user: SessionUser,
        entries: Vec<DashboardEntry>,
    },
}

/// Read-only view of a single course for the detail page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDetail {
    pub course: Course,
    pub price_label: String,
    pub is_enrolled: bool,
    pub can_enroll: bool,
    pub enroll_label: String,
}

/// Outcome of an enroll call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollOutcome {
    pub enrollment: Enrollment,
    /// False when the user was already enrolled and nothing was written.
    pub created: bool,
}
