//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the catalog, enrollment and dashboard
//! endpoints, their response payloads, and the master definition for the
//! OpenAPI specification.

use crate::error::ApiError;
use crate::web::auth::{LoginRequest, RegisterRequest, SessionResponse, SessionView};
use crate::web::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use chrono::{DateTime, Utc};
use course_catalog_core::{
    CatalogFilter, Course, CourseDetail, Dashboard, DashboardEntry, Enrollment, Lesson,
    SessionUser,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        list_courses_handler,
        list_categories_handler,
        course_detail_handler,
        enroll_handler,
        complete_lesson_handler,
        dashboard_handler,
        crate::web::auth::register_handler,
        crate::web::auth::login_handler,
        crate::web::auth::logout_handler,
        crate::web::auth::current_session_handler,
    ),
    components(
        schemas(
            CourseView, LessonView, CourseDetailView, EnrollmentView, EnrollResponse,
            DashboardResponse, DashboardEntryView, RegisterRequest, LoginRequest,
            SessionView, SessionResponse
        )
    ),
    tags(
        (name = "Course Catalog API", description = "Catalog browsing, enrollment and the learner dashboard.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// Catalog filters taken from the query string. Missing values match everything.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CatalogQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub level: Option<String>,
}

impl From<CatalogQuery> for CatalogFilter {
    fn from(q: CatalogQuery) -> Self {
        CatalogFilter {
            search: q.search.unwrap_or_default(),
            category: q.category.unwrap_or_default(),
            level: q.level.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LessonView {
    pub id: String,
    pub title: String,
    /// Length in seconds.
    pub duration: u32,
    pub duration_minutes: u32,
    pub url: String,
}

impl From<Lesson> for LessonView {
    fn from(lesson: Lesson) -> Self {
        Self {
            duration_minutes: lesson.duration_minutes(),
            id: lesson.id,
            title: lesson.title,
            duration: lesson.duration,
            url: lesson.url,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CourseView {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub category: String,
    pub level: String,
    pub price: f64,
    pub price_label: String,
    pub instructor: String,
    pub lessons: Vec<LessonView>,
}

impl From<Course> for CourseView {
    fn from(course: Course) -> Self {
        Self {
            price_label: course.price_label(),
            id: course.id,
            title: course.title,
            slug: course.slug,
            description: course.description,
            category: course.category,
            level: course.level,
            price: course.price,
            instructor: course.instructor,
            lessons: course.lessons.into_iter().map(LessonView::from).collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CourseDetailView {
    pub course: CourseView,
    pub is_enrolled: bool,
    /// Whether the enroll action should be offered.
    pub can_enroll: bool,
    pub enroll_label: String,
}

impl From<CourseDetail> for CourseDetailView {
    fn from(detail: CourseDetail) -> Self {
        Self {
            course: detail.course.into(),
            is_enrolled: detail.is_enrolled,
            can_enroll: detail.can_enroll,
            enroll_label: detail.enroll_label,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EnrollmentView {
    pub user_id: String,
    pub course_id: String,
    pub enrolled_at: DateTime<Utc>,
    pub completed_lessons: Vec<String>,
}

impl From<Enrollment> for EnrollmentView {
    fn from(enrollment: Enrollment) -> Self {
        Self {
            user_id: enrollment.user_id,
            course_id: enrollment.course_id,
            enrolled_at: enrollment.enrolled_at,
            completed_lessons: enrollment.progress.into_keys().collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EnrollResponse {
    pub enrollment: EnrollmentView,
    /// False when the user was already enrolled.
    pub created: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardEntryView {
    pub course: CourseView,
    pub enrolled_at: DateTime<Utc>,
    pub progress_percent: u32,
}

impl From<DashboardEntry> for DashboardEntryView {
    fn from(entry: DashboardEntry) -> Self {
        Self {
            course: entry.course.into(),
            enrolled_at: entry.enrolled_at,
            progress_percent: entry.progress_percent,
        }
    }
}

/// `status` is `ready` or `login_required`.
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardResponse {
    pub status: String,
    pub user: Option<SessionView>,
    pub entries: Vec<DashboardEntryView>,
}

impl From<Dashboard> for DashboardResponse {
    fn from(dashboard: Dashboard) -> Self {
        match dashboard {
            Dashboard::LoginRequired => Self {
                status: "login_required".to_string(),
                user: None,
                entries: Vec::new(),
            },
            Dashboard::Ready { user, entries } => Self {
                status: "ready".to_string(),
                user: Some(user.into()),
                entries: entries.into_iter().map(DashboardEntryView::from).collect(),
            },
        }
    }
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// List the catalog, optionally filtered by search text, category and level.
#[utoipa::path(
    get,
    path = "/courses",
    params(CatalogQuery),
    responses(
        (status = 200, description = "Matching courses in catalog order", body = [CourseView]),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_courses_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<Vec<CourseView>>, ApiError> {
    let filter = CatalogFilter::from(query);
    let courses = state.catalog.filter_courses(&filter).await?;
    Ok(Json(courses.into_iter().map(CourseView::from).collect()))
}

/// Distinct course categories, for populating a filter control.
#[utoipa::path(
    get,
    path = "/categories",
    responses(
        (status = 200, description = "Categories in first-seen order", body = [String])
    )
)]
pub async fn list_categories_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.catalog.categories().await?))
}

/// Show one course by slug, including whether the current user is enrolled.
#[utoipa::path(
    get,
    path = "/courses/{slug}",
    params(("slug" = String, Path, description = "The course slug.")),
    responses(
        (status = 200, description = "Course detail", body = CourseDetailView),
        (status = 404, description = "Course not found")
    )
)]
pub async fn course_detail_handler(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<CourseDetailView>, ApiError> {
    let session = state.catalog.current_session().await?;
    let detail = state.catalog.course_detail(&slug, session.as_ref()).await?;
    Ok(Json(detail.into()))
}

/// Enroll the current user in a course. Repeating the call is harmless.
#[utoipa::path(
    post,
    path = "/enrollments/{course_id}",
    params(("course_id" = String, Path, description = "The course id.")),
    responses(
        (status = 201, description = "Enrolled", body = EnrollResponse),
        (status = 200, description = "Already enrolled", body = EnrollResponse),
        (status = 401, description = "Please login or register to enroll"),
        (status = 404, description = "Course not found")
    )
)]
pub async fn enroll_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Path(course_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = state.catalog.enroll(&user, &course_id).await?;
    let status = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    let body = EnrollResponse {
        enrollment: outcome.enrollment.into(),
        created: outcome.created,
    };
    Ok((status, Json(body)))
}

/// Mark a lesson of an enrolled course as completed.
#[utoipa::path(
    post,
    path = "/enrollments/{course_id}/lessons/{lesson_id}/complete",
    params(
        ("course_id" = String, Path, description = "The course id."),
        ("lesson_id" = String, Path, description = "The lesson id.")
    ),
    responses(
        (status = 200, description = "Progress recorded", body = EnrollmentView),
        (status = 401, description = "Please login or register first"),
        (status = 404, description = "Course, lesson or enrollment not found")
    )
)]
pub async fn complete_lesson_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Path((course_id, lesson_id)): Path<(String, String)>,
) -> Result<Json<EnrollmentView>, ApiError> {
    let enrollment = state
        .catalog
        .mark_lesson_complete(&user, &course_id, &lesson_id)
        .await?;
    Ok(Json(enrollment.into()))
}

/// The current user's enrolled courses with progress.
#[utoipa::path(
    get,
    path = "/dashboard",
    responses(
        (status = 200, description = "Dashboard, or a login_required status without a session", body = DashboardResponse)
    )
)]
pub async fn dashboard_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DashboardResponse>, ApiError> {
    let session = state.catalog.current_session().await?;
    let dashboard = state.catalog.dashboard(session.as_ref()).await?;
    Ok(Json(dashboard.into()))
}
