//! crates/course_catalog_core/src/service.rs
//!
//! The workflow operations: catalog queries, authentication, enrollment and
//! the dashboard/detail projections. Each operation validates and looks up
//! everything it needs before its single write, so a failure leaves stored
//! state untouched.
//!
//! Every operation reads whole collections and writes them back, so the
//! service runs one operation at a time behind `gate`.

use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::catalog;
use crate::domain::{
    normalize_email, Account, CatalogFilter, Course, CourseDetail, Dashboard, DashboardEntry,
    EnrollOutcome, Enrollment, Role, SessionUser,
};
use crate::error::{CatalogError, CatalogResult};
use crate::ports::{
    CourseRepository, CredentialVerifier, EnrollmentRepository, KeyValueStore, SessionStore,
    UserRepository,
};
use crate::repositories::{
    KvCourseRepository, KvEnrollmentRepository, KvSessionStore, KvUserRepository,
};
use crate::storage::Storage;

#[derive(Clone)]
pub struct CatalogService {
    courses: Arc<dyn CourseRepository>,
    users: Arc<dyn UserRepository>,
    enrollments: Arc<dyn EnrollmentRepository>,
    session: Arc<dyn SessionStore>,
    verifier: Arc<dyn CredentialVerifier>,
    gate: Arc<Mutex<()>>,
}

impl CatalogService {
    pub fn new(
        courses: Arc<dyn CourseRepository>,
        users: Arc<dyn UserRepository>,
        enrollments: Arc<dyn EnrollmentRepository>,
        session: Arc<dyn SessionStore>,
        verifier: Arc<dyn CredentialVerifier>,
    ) -> Self {
        Self {
            courses,
            users,
            enrollments,
            session,
            verifier,
            gate: Arc::new(Mutex::new(())),
        }
    }

    /// Wires all four repositories onto one key-value backend.
    pub fn with_store(backend: Arc<dyn KeyValueStore>, verifier: Arc<dyn CredentialVerifier>) -> Self {
        let storage = Storage::new(backend);
        Self::new(
            Arc::new(KvCourseRepository::new(storage.clone())),
            Arc::new(KvUserRepository::new(storage.clone())),
            Arc::new(KvEnrollmentRepository::new(storage.clone())),
            Arc::new(KvSessionStore::new(storage)),
            verifier,
        )
    }

    // --- Catalog ---

    pub async fn list_courses(&self) -> CatalogResult<Vec<Course>> {
        let _gate = self.gate.lock().await;
        Ok(self.courses.list().await?)
    }

    pub async fn filter_courses(&self, filter: &CatalogFilter) -> CatalogResult<Vec<Course>> {
        let _gate = self.gate.lock().await;
        let courses = self.courses.list().await?;
        Ok(catalog::filter_catalog(&courses, filter))
    }

    pub async fn categories(&self) -> CatalogResult<Vec<String>> {
        let _gate = self.gate.lock().await;
        let courses = self.courses.list().await?;
        Ok(catalog::list_categories(&courses))
    }

    pub async fn find_by_slug(&self, slug: &str) -> CatalogResult<Course> {
        let _gate = self.gate.lock().await;
        self.course_by_slug(slug).await
    }

    pub async fn find_by_id(&self, id: &str) -> CatalogResult<Course> {
        let _gate = self.gate.lock().await;
        self.course_by_id(id).await
    }

    async fn course_by_slug(&self, slug: &str) -> CatalogResult<Course> {
        let courses = self.courses.list().await?;
        catalog::find_by_slug(&courses, slug)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("Course '{}'", slug)))
    }

    async fn course_by_id(&self, id: &str) -> CatalogResult<Course> {
        let courses = self.courses.list().await?;
        catalog::find_by_id(&courses, id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("Course id '{}'", id)))
    }

    // --- Authentication ---

    /// Creates an account and logs it in.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> CatalogResult<SessionUser> {
        let mut account = Account::new(name, email, password, role)?;
        let _gate = self.gate.lock().await;
        if self.users.find_by_email(&account.email).await?.is_some() {
            return Err(CatalogError::DuplicateEmail(account.email));
        }
        account.password = self.verifier.seal(password)?;

        let user = account.to_session();
        self.users.insert(account).await?;
        if let Err(e) = self.session.set(&user).await {
            // Without a session the registration did not happen.
            if let Err(undo) = self.users.remove(&user.email).await {
                warn!(email = %user.email, error = %undo, "Could not roll back account");
            }
            return Err(e.into());
        }
        info!(email = %user.email, role = %user.role, "Registered new account");
        Ok(user)
    }

    pub async fn login(&self, email: &str, password: &str) -> CatalogResult<SessionUser> {
        let _gate = self.gate.lock().await;
        let email = normalize_email(email);
        let account = self
            .users
            .find_by_email(&email)
            .await?
            .filter(|a| self.verifier.verify(password, &a.password))
            .ok_or(CatalogError::InvalidCredentials)?;

        let user = account.to_session();
        self.session.set(&user).await?;
        info!(email = %user.email, "Logged in");
        Ok(user)
    }

    pub async fn logout(&self) -> CatalogResult<()> {
        let _gate = self.gate.lock().await;
        self.session.clear().await?;
        info!("Logged out");
        Ok(())
    }

    pub async fn current_session(&self) -> CatalogResult<Option<SessionUser>> {
        let _gate = self.gate.lock().await;
        Ok(self.session.current().await?)
    }

    // --- Enrollment ---

    /// Enrolls `user` in `course_id`. Enrolling twice returns the existing record.
    pub async fn enroll(&self, user: &SessionUser, course_id: &str) -> CatalogResult<EnrollOutcome> {
        let _gate = self.gate.lock().await;
        self.course_by_id(course_id).await?;

        let mut enrollments = self.enrollments.list().await?;
        if let Some(existing) = enrollments.iter().find(|e| e.matches(&user.email, course_id)) {
            return Ok(EnrollOutcome {
                enrollment: existing.clone(),
                created: false,
            });
        }

        let enrollment = Enrollment::new(&user.email, course_id, Utc::now());
        enrollments.push(enrollment.clone());
        self.enrollments.save_all(&enrollments).await?;
        info!(email = %user.email, course_id, "Enrolled");
        Ok(EnrollOutcome {
            enrollment,
            created: true,
        })
    }

    /// Records a completed lesson on the user's enrollment.
    pub async fn mark_lesson_complete(
        &self,
        user: &SessionUser,
        course_id: &str,
        lesson_id: &str,
    ) -> CatalogResult<Enrollment> {
        let _gate = self.gate.lock().await;
        let course = self.course_by_id(course_id).await?;
        if course.lesson(lesson_id).is_none() {
            return Err(CatalogError::NotFound(format!(
                "Lesson '{}' in course '{}'",
                lesson_id, course_id
            )));
        }

        let mut enrollments = self.enrollments.list().await?;
        let enrollment = enrollments
            .iter_mut()
            .find(|e| e.matches(&user.email, course_id))
            .ok_or_else(|| {
                CatalogError::NotFound(format!("Enrollment in course '{}'", course_id))
            })?;
        enrollment
            .progress
            .insert(lesson_id.to_string(), serde_json::Value::Bool(true));
        let updated = enrollment.clone();

        self.enrollments.save_all(&enrollments).await?;
        info!(email = %user.email, course_id, lesson_id, "Lesson completed");
        Ok(updated)
    }

    // --- Projections ---

    /// The signed-in user's enrollments joined with their courses.
    pub async fn dashboard(&self, session: Option<&SessionUser>) -> CatalogResult<Dashboard> {
        let Some(user) = session else {
            return Ok(Dashboard::LoginRequired);
        };

        let _gate = self.gate.lock().await;
        let courses = self.courses.list().await?;
        let entries = self
            .enrollments
            .list()
            .await?
            .into_iter()
            .filter(|e| e.user_id == user.email)
            .filter_map(|e| {
                let course = catalog::find_by_id(&courses, &e.course_id)?;
                Some(DashboardEntry {
                    progress_percent: e.progress_percent(course.lessons.len()),
                    enrolled_at: e.enrolled_at,
                    course: course.clone(),
                })
            })
            .collect();

        Ok(Dashboard::Ready {
            user: user.clone(),
            entries,
        })
    }

    pub async fn course_detail(
        &self,
        slug: &str,
        session: Option<&SessionUser>,
    ) -> CatalogResult<CourseDetail> {
        let _gate = self.gate.lock().await;
        let course = self.course_by_slug(slug).await?;
        let is_enrolled = match session {
            Some(user) => self
                .enrollments
                .list()
                .await?
                .iter()
                .any(|e| e.matches(&user.email, &course.id)),
            None => false,
        };

        Ok(CourseDetail {
            price_label: course.price_label(),
            enroll_label: course.enroll_label().to_string(),
            is_enrolled,
            can_enroll: !is_enrolled,
            course,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::PlaintextVerifier;
    use crate::ports::{PortError, PortResult};
    use crate::storage::{keys, MemoryStore};
    use async_trait::async_trait;

    fn service() -> CatalogService {
        CatalogService::with_store(Arc::new(MemoryStore::new()), Arc::new(PlaintextVerifier))
    }

    /// A service plus a direct handle on its user store.
    fn service_with_users() -> (CatalogService, KvUserRepository) {
        let backend: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let users = KvUserRepository::new(Storage::new(backend.clone()));
        (CatalogService::with_store(backend, Arc::new(PlaintextVerifier)), users)
    }

    #[tokio::test]
    async fn short_password_is_rejected_without_writing() {
        let (svc, users) = service_with_users();
        let err = svc.register("A", "a@x.com", "12345", Role::Student).await.unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));
        assert!(users.list().await.unwrap().is_empty());
        assert_eq!(svc.current_session().await.unwrap(), None);
    }

    #[tokio::test]
    async fn duplicate_email_is_case_insensitive() {
        let (svc, users) = service_with_users();
        svc.register("A", "a@x.com", "secret1", Role::Student).await.unwrap();
        let err = svc.register("B", "A@X.Com", "secret2", Role::Instructor).await.unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateEmail(email) if email == "a@x.com"));
        assert_eq!(users.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn register_then_login_with_uppercase_email() {
        let svc = service();
        let registered = svc.register("A", "a@x.com", "secret1", Role::Student).await.unwrap();
        assert_eq!(svc.current_session().await.unwrap(), Some(registered));

        svc.logout().await.unwrap();
        let user = svc.login("A@X.COM", "secret1").await.unwrap();
        assert_eq!(user.email, "a@x.com");
        assert_eq!(user.name, "A");
        assert_eq!(svc.current_session().await.unwrap(), Some(user));
    }

    #[tokio::test]
    async fn login_failures_are_indistinguishable() {
        let svc = service();
        svc.register("A", "a@x.com", "secret1", Role::Student).await.unwrap();
        svc.logout().await.unwrap();

        let wrong_password = svc.login("a@x.com", "secret2").await.unwrap_err();
        let unknown_email = svc.login("b@x.com", "secret1").await.unwrap_err();
        assert!(matches!(wrong_password, CatalogError::InvalidCredentials));
        assert!(matches!(unknown_email, CatalogError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
        assert_eq!(svc.current_session().await.unwrap(), None);
    }

    #[tokio::test]
    async fn enroll_is_idempotent() {
        let svc = service();
        let user = svc.register("A", "a@x.com", "secret1", Role::Student).await.unwrap();

        let first = svc.enroll(&user, "c_react").await.unwrap();
        let second = svc.enroll(&user, "c_react").await.unwrap();
        assert!(first.created);
        assert!(!second.created);
        assert_eq!(first.enrollment, second.enrollment);

        match svc.dashboard(Some(&user)).await.unwrap() {
            Dashboard::Ready { entries, .. } => assert_eq!(entries.len(), 1),
            Dashboard::LoginRequired => panic!("expected a dashboard"),
        }
    }

    #[tokio::test]
    async fn enroll_unknown_course_is_not_found() {
        let svc = service();
        let user = svc.register("A", "a@x.com", "secret1", Role::Student).await.unwrap();
        let err = svc.enroll(&user, "c_missing").await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
    }

    #[tokio::test]
    async fn dashboard_reports_half_progress() {
        let svc = service();
        let user = svc.register("A", "a@x.com", "secret1", Role::Student).await.unwrap();
        svc.enroll(&user, "c_js_basics").await.unwrap();
        svc.mark_lesson_complete(&user, "c_js_basics", "l1").await.unwrap();
        // Marking twice does not double count.
        svc.mark_lesson_complete(&user, "c_js_basics", "l1").await.unwrap();

        let Dashboard::Ready { entries, user: shown } = svc.dashboard(Some(&user)).await.unwrap() else {
            panic!("expected a dashboard");
        };
        assert_eq!(shown, user);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].course.id, "c_js_basics");
        assert_eq!(entries[0].progress_percent, 50);
    }

    #[tokio::test]
    async fn lesson_completion_requires_enrollment_and_known_lesson() {
        let svc = service();
        let user = svc.register("A", "a@x.com", "secret1", Role::Student).await.unwrap();
        assert!(matches!(
            svc.mark_lesson_complete(&user, "c_js_basics", "l1").await,
            Err(CatalogError::NotFound(_))
        ));
        svc.enroll(&user, "c_js_basics").await.unwrap();
        assert!(matches!(
            svc.mark_lesson_complete(&user, "c_js_basics", "zz").await,
            Err(CatalogError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn dashboard_drops_enrollments_for_missing_courses() {
        let backend: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let storage = Storage::new(backend.clone());
        let svc = CatalogService::with_store(backend, Arc::new(PlaintextVerifier));
        let user = svc.register("A", "a@x.com", "secret1", Role::Student).await.unwrap();
        svc.enroll(&user, "c_uiux").await.unwrap();

        let mut enrollments: Vec<Enrollment> = storage.get(keys::ENROLLMENTS, Vec::new()).await.unwrap();
        enrollments.push(Enrollment::new("a@x.com", "c_gone", Utc::now()));
        enrollments.push(Enrollment::new("other@x.com", "c_react", Utc::now()));
        storage.set(keys::ENROLLMENTS, &enrollments).await.unwrap();

        let Dashboard::Ready { entries, .. } = svc.dashboard(Some(&user)).await.unwrap() else {
            panic!("expected a dashboard");
        };
        let ids: Vec<&str> = entries.iter().map(|e| e.course.id.as_str()).collect();
        assert_eq!(ids, vec!["c_uiux"]);
    }

    #[tokio::test]
    async fn logout_sends_dashboard_back_to_login() {
        let svc = service();
        svc.register("A", "a@x.com", "secret1", Role::Student).await.unwrap();
        svc.logout().await.unwrap();
        let session = svc.current_session().await.unwrap();
        assert_eq!(svc.dashboard(session.as_ref()).await.unwrap(), Dashboard::LoginRequired);
    }

    #[tokio::test]
    async fn course_detail_tracks_enrollment() {
        let svc = service();
        let anonymous = svc.course_detail("javascript-basics", None).await.unwrap();
        assert!(!anonymous.is_enrolled);
        assert!(anonymous.can_enroll);
        assert_eq!(anonymous.price_label, "Free");
        assert_eq!(anonymous.enroll_label, "Enroll for Free");

        let user = svc.register("A", "a@x.com", "secret1", Role::Student).await.unwrap();
        svc.enroll(&user, "c_js_basics").await.unwrap();
        let detail = svc.course_detail("javascript-basics", Some(&user)).await.unwrap();
        assert!(detail.is_enrolled);
        assert!(!detail.can_enroll);

        let paid = svc.course_detail("react-for-beginners", Some(&user)).await.unwrap();
        assert_eq!(paid.price_label, "₹9.99");
        assert_eq!(paid.enroll_label, "Enroll");
    }

    #[tokio::test]
    async fn unknown_slug_is_not_found() {
        let svc = service();
        assert!(matches!(
            svc.course_detail("no-such-course", None).await,
            Err(CatalogError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn filter_and_categories_use_seeded_catalog() {
        let svc = service();
        let filter = CatalogFilter { category: "Design".into(), ..Default::default() };
        let design = svc.filter_courses(&filter).await.unwrap();
        assert_eq!(design.len(), 1);
        assert_eq!(design[0].title, "UI/UX Essentials");
        assert_eq!(svc.categories().await.unwrap(), vec!["Programming", "Design"]);
    }

    /// Yields to the scheduler around every access so concurrent operations interleave.
    struct YieldingStore(MemoryStore);

    #[async_trait]
    impl KeyValueStore for YieldingStore {
        async fn get_raw(&self, key: &str) -> PortResult<Option<String>> {
            tokio::task::yield_now().await;
            self.0.get_raw(key).await
        }

        async fn set_raw(&self, key: &str, value: &str) -> PortResult<()> {
            tokio::task::yield_now().await;
            self.0.set_raw(key, value).await
        }

        async fn remove(&self, key: &str) -> PortResult<()> {
            tokio::task::yield_now().await;
            self.0.remove(key).await
        }
    }

    /// Refuses every write to the session slot.
    struct BrokenSessionStore(MemoryStore);

    #[async_trait]
    impl KeyValueStore for BrokenSessionStore {
        async fn get_raw(&self, key: &str) -> PortResult<Option<String>> {
            self.0.get_raw(key).await
        }

        async fn set_raw(&self, key: &str, value: &str) -> PortResult<()> {
            if key == keys::CURRENT_USER {
                return Err(PortError::Unexpected("session slot unavailable".into()));
            }
            self.0.set_raw(key, value).await
        }

        async fn remove(&self, key: &str) -> PortResult<()> {
            self.0.remove(key).await
        }
    }

    fn interleaving_service() -> (CatalogService, KvUserRepository) {
        let backend: Arc<dyn KeyValueStore> = Arc::new(YieldingStore(MemoryStore::new()));
        let users = KvUserRepository::new(Storage::new(backend.clone()));
        (CatalogService::with_store(backend, Arc::new(PlaintextVerifier)), users)
    }

    #[tokio::test]
    async fn concurrent_registrations_keep_emails_unique() {
        let (svc, users) = interleaving_service();
        let (a, b) = tokio::join!(
            svc.register("A", "a@x.com", "secret1", Role::Student),
            svc.register("B", "A@X.COM", "secret2", Role::Student),
        );

        assert_eq!([a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(), 1);
        let failure = a.err().or(b.err()).unwrap();
        assert!(matches!(failure, CatalogError::DuplicateEmail(_)));
        assert_eq!(users.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn concurrent_enrollments_are_all_kept() {
        let (svc, _) = interleaving_service();
        let user = svc.register("A", "a@x.com", "secret1", Role::Student).await.unwrap();
        let (react, uiux) = tokio::join!(svc.enroll(&user, "c_react"), svc.enroll(&user, "c_uiux"));
        assert!(react.unwrap().created);
        assert!(uiux.unwrap().created);

        let Dashboard::Ready { entries, .. } = svc.dashboard(Some(&user)).await.unwrap() else {
            panic!("expected a dashboard");
        };
        let mut ids: Vec<&str> = entries.iter().map(|e| e.course.id.as_str()).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec!["c_react", "c_uiux"]);
    }

    #[tokio::test]
    async fn concurrent_lesson_completions_are_all_kept() {
        let (svc, _) = interleaving_service();
        let user = svc.register("A", "a@x.com", "secret1", Role::Student).await.unwrap();
        svc.enroll(&user, "c_js_basics").await.unwrap();
        let (l1, l2) = tokio::join!(
            svc.mark_lesson_complete(&user, "c_js_basics", "l1"),
            svc.mark_lesson_complete(&user, "c_js_basics", "l2"),
        );
        l1.unwrap();
        l2.unwrap();

        let Dashboard::Ready { entries, .. } = svc.dashboard(Some(&user)).await.unwrap() else {
            panic!("expected a dashboard");
        };
        assert_eq!(entries[0].progress_percent, 100);
    }

    #[tokio::test]
    async fn failed_session_write_undoes_registration() {
        let backend: Arc<dyn KeyValueStore> = Arc::new(BrokenSessionStore(MemoryStore::new()));
        let users = KvUserRepository::new(Storage::new(backend.clone()));
        let svc = CatalogService::with_store(backend, Arc::new(PlaintextVerifier));

        let err = svc.register("A", "a@x.com", "secret1", Role::Student).await.unwrap_err();
        assert!(matches!(err, CatalogError::Port(_)));
        assert!(users.list().await.unwrap().is_empty());
        assert_eq!(svc.current_session().await.unwrap(), None);
    }
}
