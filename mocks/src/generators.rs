//! Random test data generators using the fake crate
//!
//! Provides realistic random data including:
//! - Task names and descriptions
//! - Due dates around today
//! - Property-based testing strategies

use chrono::{Duration, NaiveDate, Utc};
use fake::faker::lorem::en::{Paragraph, Sentence};
use fake::Fake;
use proptest::prelude::*;
use rand::Rng;
use task_core::{NewTask, Status, Task};

/// Generate a realistic task name
pub fn generate_task_name() -> String {
    Sentence(3..8).fake()
}

/// Generate a realistic task description
pub fn generate_task_description() -> String {
    Paragraph(2..5).fake()
}

/// Generate a due date within a month either side of today
pub fn generate_due_date() -> NaiveDate {
    let offset = rand::thread_rng().gen_range(-30..=30);
    (Utc::now() + Duration::days(offset)).date_naive()
}

/// Generate a random task status
pub fn generate_random_status() -> Status {
    Status::ALL[rand::thread_rng().gen_range(0..Status::ALL.len())]
}

/// Generate a random new task with realistic data
pub fn generate_random_new_task() -> NewTask {
    NewTask::new(generate_task_name(), generate_task_description())
        .with_due(generate_due_date())
        .with_status(generate_random_status())
}

/// Generate a random stored task with realistic data
pub fn generate_random_task() -> Task {
    let id: u32 = (1..99999).fake();
    Task::from_new(id as i64, generate_random_new_task(), Utc::now())
}

/// Proptest strategy for generating task statuses
pub fn status_strategy() -> impl Strategy<Value = Status> {
    prop::sample::select(Status::ALL.to_vec())
}

/// Proptest strategy for generating due dates
pub fn due_date_strategy() -> impl Strategy<Value = NaiveDate> {
    // Days from the common era keep every value a valid date
    (730_000i32..760_000).prop_map(|days| {
        NaiveDate::from_num_days_from_ce_opt(days).unwrap_or_default()
    })
}

/// Proptest strategy for generating new tasks with valid names
pub fn new_task_strategy() -> impl Strategy<Value = NewTask> {
    (
        "[A-Za-z][A-Za-z ]{0,49}",
        "[A-Za-z0-9 .,!?]{0,200}",
        due_date_strategy(),
        status_strategy(),
    )
        .prop_map(|(name, description, due, status)| {
            NewTask::new(name, description)
                .with_due(due)
                .with_status(status)
        })
}

/// Proptest strategy for generating complete tasks
pub fn task_strategy() -> impl Strategy<Value = Task> {
    (1i64..99999, new_task_strategy(), 1i64..100).prop_map(|(id, new_task, version)| Task {
        version,
        ..Task::from_new(id, new_task, Utc::now())
    })
}
