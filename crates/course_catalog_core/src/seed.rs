//! crates/course_catalog_core/src/seed.rs
//!
//! The sample catalog written on first access.

use crate::domain::{Course, Lesson};

fn lesson(id: &str, title: &str, duration: u32) -> Lesson {
    Lesson {
        id: id.to_string(),
        title: title.to_string(),
        duration,
        url: String::new(),
    }
}

pub fn sample_courses() -> Vec<Course> {
    vec![
        Course {
            id: "c_js_basics".to_string(),
            title: "JavaScript Basics".to_string(),
            slug: "javascript-basics".to_string(),
            description: "Learn the fundamentals of JavaScript: variables, functions, DOM."
                .to_string(),
            category: "Programming".to_string(),
            level: "Beginner".to_string(),
            price: 0.0,
            instructor: "Instructor A".to_string(),
            lessons: vec![
                lesson("l1", "Intro & Setup", 300),
                lesson("l2", "Variables & Types", 600),
            ],
        },
        Course {
            id: "c_react".to_string(),
            title: "React for Beginners".to_string(),
            slug: "react-for-beginners".to_string(),
            description: "Build interactive UIs with React, JSX, components & state.".to_string(),
            category: "Programming".to_string(),
            level: "Beginner".to_string(),
            price: 9.99,
            instructor: "Instructor B".to_string(),
            lessons: vec![
                lesson("r1", "JSX & Components", 500),
                lesson("r2", "State & Props", 800),
            ],
        },
        Course {
            id: "c_uiux".to_string(),
            title: "UI/UX Essentials".to_string(),
            slug: "ui-ux-essentials".to_string(),
            description:
                "Design beautiful and usable interfaces. Design thinking & prototyping."
                    .to_string(),
            category: "Design".to_string(),
            level: "Intermediate".to_string(),
            price: 14.99,
            instructor: "Instructor C".to_string(),
            lessons: vec![lesson("u1", "Design Principles", 700)],
        },
    ]
}
