//! Mock implementations and test utilities for the task tracker
//!
//! This crate provides the shared testing infrastructure:
//! - An in-memory [`MockTaskRepository`]
//! - Builders and fixtures for tasks and form submissions
//! - Random data generators and proptest strategies
//! - Custom assertion helpers
//! - The repository contract suite every store must pass

pub mod assertions;
pub mod builders;
pub mod contracts;
pub mod fixtures;
pub mod generators;
pub mod repository;

pub use assertions::*;
pub use builders::*;
pub use contracts::*;
pub use fixtures::*;
pub use generators::*;
pub use repository::MockTaskRepository;
