/// Storage layer for persisting habit, book and digest data
///
/// This module defines the data-access interface every other layer is handed
/// explicitly, and its SQLite implementation. Derived values (streaks,
/// progress, heatmaps) are never stored.

pub mod migrations;
pub mod sqlite;

// Re-export the main storage types
pub use sqlite::*;

use thiserror::Error;

use crate::domain::{
    Book, BookId, BookStatus, DayKey, Habit, HabitId, HabitLog, LogId, UserId, WeeklyDigest,
};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Habit not found: {habit_id}")]
    HabitNotFound { habit_id: String },

    #[error("Log not found: {log_id}")]
    LogNotFound { log_id: String },

    #[error("Book not found: {book_id}")]
    BookNotFound { book_id: String },

    #[error("Migration error: {0}")]
    Migration(String),
}

/// Data-access interface for the habit tracker
///
/// Every read and delete is scoped to the owning user; records of other users
/// behave as if they did not exist.
pub trait HabitFlowStore {
    /// Create a new habit
    fn create_habit(&self, habit: &Habit) -> Result<(), StorageError>;

    /// Get one of the user's habits
    fn get_habit(&self, user_id: &UserId, habit_id: &HabitId) -> Result<Habit, StorageError>;

    /// List the user's habits, oldest first
    fn list_habits(&self, user_id: &UserId) -> Result<Vec<Habit>, StorageError>;

    /// Update an existing habit
    fn update_habit(&self, habit: &Habit) -> Result<(), StorageError>;

    /// Delete a habit and all its logs
    fn delete_habit(&self, user_id: &UserId, habit_id: &HabitId) -> Result<(), StorageError>;

    /// All logs of all the user's habits, newest first
    fn list_logs(&self, user_id: &UserId) -> Result<Vec<HabitLog>, StorageError>;

    /// The user's logs with `start <= completed_at <= end`
    fn list_logs_in_range(
        &self,
        user_id: &UserId,
        start: DayKey,
        end: DayKey,
    ) -> Result<Vec<HabitLog>, StorageError>;

    /// The log for a habit on a given day, if any
    fn find_log(&self, habit_id: &HabitId, day: DayKey) -> Result<Option<HabitLog>, StorageError>;

    /// Record a completion; returns the existing log if the day was already logged
    fn upsert_log(&self, habit_id: &HabitId, day: DayKey) -> Result<HabitLog, StorageError>;

    /// Remove a completion
    fn delete_log(&self, log_id: &LogId) -> Result<(), StorageError>;

    /// Add a book
    fn create_book(&self, book: &Book) -> Result<(), StorageError>;

    /// Get one of the user's books
    fn get_book(&self, user_id: &UserId, book_id: &BookId) -> Result<Book, StorageError>;

    /// List the user's books, newest first, optionally by status
    fn list_books(
        &self,
        user_id: &UserId,
        status: Option<BookStatus>,
    ) -> Result<Vec<Book>, StorageError>;

    /// Update an existing book
    fn update_book(&self, book: &Book) -> Result<(), StorageError>;

    /// Delete a book
    fn delete_book(&self, user_id: &UserId, book_id: &BookId) -> Result<(), StorageError>;

    /// Append a generated digest
    fn create_digest(&self, digest: &WeeklyDigest) -> Result<(), StorageError>;

    /// Most recent digests first, at most `limit`
    fn list_digests(&self, user_id: &UserId, limit: u32) -> Result<Vec<WeeklyDigest>, StorageError>;
}
