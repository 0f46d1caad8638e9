//! crates/course_catalog_core/src/catalog.rs
//!
//! Pure projections over a slice of courses. Nothing here touches storage.

use crate::domain::{CatalogFilter, Course};

/// Narrows `courses` by search text, category and level, keeping catalog order.
///
/// Search is a case-insensitive substring match on title or description.
/// Category and level must match exactly. Empty criteria match everything.
pub fn filter_catalog(courses: &[Course], filter: &CatalogFilter) -> Vec<Course> {
    let search = filter.search.to_lowercase();
    courses
        .iter()
        .filter(|c| {
            search.is_empty()
                || c.title.to_lowercase().contains(&search)
                || c.description.to_lowercase().contains(&search)
        })
        .filter(|c| filter.category.is_empty() || c.category == filter.category)
        .filter(|c| filter.level.is_empty() || c.level == filter.level)
        .cloned()
        .collect()
}

/// Distinct categories in the order they first appear.
pub fn list_categories(courses: &[Course]) -> Vec<String> {
    let mut categories: Vec<String> = Vec::new();
    for course in courses {
        if !categories.contains(&course.category) {
            categories.push(course.category.clone());
        }
    }
    categories
}

pub fn find_by_slug<'a>(courses: &'a [Course], slug: &str) -> Option<&'a Course> {
    courses.iter().find(|c| c.slug == slug)
}

pub fn find_by_id<'a>(courses: &'a [Course], id: &str) -> Option<&'a Course> {
    courses.iter().find(|c| c.id == id)
}
