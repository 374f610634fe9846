/// Domain module containing core business logic and data types
///
/// This module defines the core entities (Habit, HabitLog, Book, WeeklyDigest)
/// and the pure computations over them: day-key normalization, streaks,
/// activity heatmaps and reading progress. Nothing in here performs I/O.

pub mod activity;
pub mod book;
pub mod day_key;
pub mod digest;
pub mod entry;
pub mod habit;
pub mod streak;
pub mod types;

// Re-export public types for easy access
pub use activity::*;
pub use book::*;
pub use day_key::*;
pub use digest::*;
pub use entry::*;
pub use habit::*;
pub use streak::*;
pub use types::*;

use thiserror::Error;

/// Errors that can occur during domain operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid habit name: {0}")]
    InvalidHabitName(String),

    #[error("Invalid target days: {0}")]
    InvalidTargetDays(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid value: {message}")]
    InvalidValue { message: String },
}
