//! crates/course_catalog_core/src/repositories.rs
//!
//! Repository implementations over `Storage`. Each one owns exactly one
//! logical key and always rewrites the whole collection.

use async_trait::async_trait;
use tracing::debug;

use crate::domain::{Account, Course, Enrollment, SessionUser};
use crate::ports::{CourseRepository, EnrollmentRepository, PortResult, SessionStore, UserRepository};
use crate::seed::sample_courses;
use crate::storage::{keys, Storage};

//=========================================================================================
// Courses
//=========================================================================================

pub struct KvCourseRepository {
    storage: Storage,
}

impl KvCourseRepository {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl CourseRepository for KvCourseRepository {
    async fn list(&self) -> PortResult<Vec<Course>> {
        match self.storage.try_get::<Vec<Course>>(keys::COURSES).await? {
            Some(courses) => Ok(courses),
            None => {
                let courses = sample_courses();
                debug!(count = courses.len(), "Seeding sample catalog");
                self.storage.set(keys::COURSES, &courses).await?;
                Ok(courses)
            }
        }
    }
}

//=========================================================================================
// Users
//=========================================================================================

pub struct KvUserRepository {
    storage: Storage,
}

impl KvUserRepository {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl UserRepository for KvUserRepository {
    async fn list(&self) -> PortResult<Vec<Account>> {
        self.storage.get(keys::USERS, Vec::new()).await
    }

    async fn find_by_email(&self, email: &str) -> PortResult<Option<Account>> {
        let users = self.list().await?;
        Ok(users.into_iter().find(|u| u.email == email))
    }

    async fn insert(&self, account: Account) -> PortResult<()> {
        let mut users = self.list().await?;
        users.push(account);
        self.storage.set(keys::USERS, &users).await
    }

    async fn remove(&self, email: &str) -> PortResult<()> {
        let mut users = self.list().await?;
        users.retain(|u| u.email != email);
        self.storage.set(keys::USERS, &users).await
    }
}

//=========================================================================================
// Enrollments
//=========================================================================================

pub struct KvEnrollmentRepository {
    storage: Storage,
}

impl KvEnrollmentRepository {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl EnrollmentRepository for KvEnrollmentRepository {
    async fn list(&self) -> PortResult<Vec<Enrollment>> {
        self.storage.get(keys::ENROLLMENTS, Vec::new()).await
    }

    async fn save_all(&self, enrollments: &[Enrollment]) -> PortResult<()> {
        self.storage.set(keys::ENROLLMENTS, enrollments).await
    }
}

//=========================================================================================
// Session
//=========================================================================================

pub struct KvSessionStore {
    storage: Storage,
}

impl KvSessionStore {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl SessionStore for KvSessionStore {
    async fn current(&self) -> PortResult<Option<SessionUser>> {
        // A logged-out slot may hold `null` rather than be absent.
        let user: Option<Option<SessionUser>> = self.storage.try_get(keys::CURRENT_USER).await?;
        Ok(user.flatten())
    }

    async fn set(&self, user: &SessionUser) -> PortResult<()> {
        self.storage.set(keys::CURRENT_USER, user).await
    }

    async fn clear(&self) -> PortResult<()> {
        self.storage.remove(keys::CURRENT_USER).await
    }
}
