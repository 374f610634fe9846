/// SQLite implementation of the storage interface
///
/// This module provides the concrete SQLite implementation for storing
/// and retrieving habits, logs, books and digests. It handles all SQL
/// queries and row conversion.

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::domain::{
    Book, BookId, BookStatus, DayKey, DigestId, Habit, HabitId, HabitLog, LogId, TargetDays,
    UserId, WeeklyDigest,
};
use crate::storage::{migrations, HabitFlowStore, StorageError};

const HABIT_COLUMNS: &str = "id, user_id, name, icon, color, target_days, created_at";

const BOOK_COLUMNS: &str = "id, user_id, title, author, total_pages, current_page, status, \
                            started_at, finished_at, notes, created_at";

const DIGEST_COLUMNS: &str = "id, user_id, week_start, content, created_at";

/// SQLite-based storage implementation
///
/// This struct holds a connection to the SQLite database and implements
/// all the operations defined in the HabitFlowStore trait.
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Open (or create) the database file and bring its schema up to date
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let db_path = db_path.as_ref();
        let conn = Connection::open(db_path)
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;

        let storage = Self::from_connection(conn)?;
        tracing::info!("SQLite storage initialized at: {:?}", db_path);
        Ok(storage)
    }

    /// Private in-memory database, used by tests
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, StorageError> {
        // Deleting a habit cascades to its logs
        conn.execute_batch("PRAGMA foreign_keys = ON")
            .map_err(|e| StorageError::Connection(format!("Failed to enable foreign keys: {}", e)))?;

        migrations::initialize_database(&conn)?;

        Ok(Self { conn })
    }
}

impl HabitFlowStore for SqliteStorage {
    fn create_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        let target_days_json = serde_json::to_string(&habit.target_days)?;

        self.conn.execute(
            "INSERT INTO habits (id, user_id, name, icon, color, target_days, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                habit.id.to_string(),
                habit.user_id.as_str(),
                habit.name,
                habit.icon,
                habit.color,
                target_days_json,
                timestamp(&habit.created_at),
            ],
        )?;

        tracing::debug!("Created habit: {} ({})", habit.name, habit.id);
        Ok(())
    }

    fn get_habit(&self, user_id: &UserId, habit_id: &HabitId) -> Result<Habit, StorageError> {
        let sql = format!("SELECT {} FROM habits WHERE id = ?1 AND user_id = ?2", HABIT_COLUMNS);

        self.conn
            .query_row(&sql, params![habit_id.to_string(), user_id.as_str()], habit_from_row)
            .optional()?
            .ok_or_else(|| StorageError::HabitNotFound {
                habit_id: habit_id.to_string(),
            })
    }

    fn list_habits(&self, user_id: &UserId) -> Result<Vec<Habit>, StorageError> {
        let sql = format!(
            "SELECT {} FROM habits WHERE user_id = ?1 ORDER BY created_at ASC, rowid ASC",
            HABIT_COLUMNS
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let habits = stmt
            .query_map(params![user_id.as_str()], habit_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(habits)
    }

    fn update_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        let target_days_json = serde_json::to_string(&habit.target_days)?;

        let rows_affected = self.conn.execute(
            "UPDATE habits SET name = ?3, icon = ?4, color = ?5, target_days = ?6
             WHERE id = ?1 AND user_id = ?2",
            params![
                habit.id.to_string(),
                habit.user_id.as_str(),
                habit.name,
                habit.icon,
                habit.color,
                target_days_json,
            ],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::HabitNotFound {
                habit_id: habit.id.to_string(),
            });
        }

        tracing::debug!("Updated habit: {} ({})", habit.name, habit.id);
        Ok(())
    }

    fn delete_habit(&self, user_id: &UserId, habit_id: &HabitId) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute(
            "DELETE FROM habits WHERE id = ?1 AND user_id = ?2",
            params![habit_id.to_string(), user_id.as_str()],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::HabitNotFound {
                habit_id: habit_id.to_string(),
            });
        }

        tracing::debug!("Deleted habit: {}", habit_id);
        Ok(())
    }

    fn list_logs(&self, user_id: &UserId) -> Result<Vec<HabitLog>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT l.id, l.habit_id, l.completed_at
             FROM habit_logs l JOIN habits h ON h.id = l.habit_id
             WHERE h.user_id = ?1
             ORDER BY l.completed_at DESC",
        )?;

        let logs = stmt
            .query_map(params![user_id.as_str()], log_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(logs)
    }

    fn list_logs_in_range(
        &self,
        user_id: &UserId,
        start: DayKey,
        end: DayKey,
    ) -> Result<Vec<HabitLog>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT l.id, l.habit_id, l.completed_at
             FROM habit_logs l JOIN habits h ON h.id = l.habit_id
             WHERE h.user_id = ?1 AND l.completed_at BETWEEN ?2 AND ?3
             ORDER BY l.completed_at DESC",
        )?;

        let logs = stmt
            .query_map(
                params![user_id.as_str(), start.to_string(), end.to_string()],
                log_from_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(logs)
    }

    fn find_log(&self, habit_id: &HabitId, day: DayKey) -> Result<Option<HabitLog>, StorageError> {
        let log = self
            .conn
            .query_row(
                "SELECT id, habit_id, completed_at FROM habit_logs
                 WHERE habit_id = ?1 AND completed_at = ?2",
                params![habit_id.to_string(), day.to_string()],
                log_from_row,
            )
            .optional()?;

        Ok(log)
    }

    fn upsert_log(&self, habit_id: &HabitId, day: DayKey) -> Result<HabitLog, StorageError> {
        let candidate = HabitLog::new(habit_id.clone(), day);

        let inserted = self.conn.execute(
            "INSERT INTO habit_logs (id, habit_id, completed_at, created_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (habit_id, completed_at) DO NOTHING",
            params![
                candidate.id.to_string(),
                habit_id.to_string(),
                day.to_string(),
                timestamp(&Utc::now()),
            ],
        )?;

        if inserted == 0 {
            tracing::debug!("Habit {} already logged for {}", habit_id, day);
        } else {
            tracing::debug!("Logged habit {} for {}", habit_id, day);
        }

        self.find_log(habit_id, day)?
            .ok_or_else(|| StorageError::LogNotFound {
                log_id: candidate.id.to_string(),
            })
    }

    fn delete_log(&self, log_id: &LogId) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute(
            "DELETE FROM habit_logs WHERE id = ?1",
            params![log_id.to_string()],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::LogNotFound {
                log_id: log_id.to_string(),
            });
        }

        tracing::debug!("Deleted log: {}", log_id);
        Ok(())
    }

    fn create_book(&self, book: &Book) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO books (
                id, user_id, title, author, total_pages, current_page, status,
                started_at, finished_at, notes, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                book.id.to_string(),
                book.user_id.as_str(),
                book.title,
                book.author,
                book.total_pages,
                book.current_page,
                book.status.as_str(),
                book.started_at.map(|d| d.to_string()),
                book.finished_at.map(|d| d.to_string()),
                book.notes,
                timestamp(&book.created_at),
            ],
        )?;

        tracing::debug!("Created book: {} ({})", book.title, book.id);
        Ok(())
    }

    fn get_book(&self, user_id: &UserId, book_id: &BookId) -> Result<Book, StorageError> {
        let sql = format!("SELECT {} FROM books WHERE id = ?1 AND user_id = ?2", BOOK_COLUMNS);

        self.conn
            .query_row(&sql, params![book_id.to_string(), user_id.as_str()], book_from_row)
            .optional()?
            .ok_or_else(|| StorageError::BookNotFound {
                book_id: book_id.to_string(),
            })
    }

    fn list_books(
        &self,
        user_id: &UserId,
        status: Option<BookStatus>,
    ) -> Result<Vec<Book>, StorageError> {
        let books = match status {
            Some(status) => {
                let sql = format!(
                    "SELECT {} FROM books WHERE user_id = ?1 AND status = ?2
                     ORDER BY created_at DESC, rowid DESC",
                    BOOK_COLUMNS
                );
                let mut stmt = self.conn.prepare(&sql)?;
                let rows = stmt.query_map(params![user_id.as_str(), status.as_str()], book_from_row)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
            None => {
                let sql = format!(
                    "SELECT {} FROM books WHERE user_id = ?1 ORDER BY created_at DESC, rowid DESC",
                    BOOK_COLUMNS
                );
                let mut stmt = self.conn.prepare(&sql)?;
                let rows = stmt.query_map(params![user_id.as_str()], book_from_row)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
        };

        Ok(books)
    }

    fn update_book(&self, book: &Book) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute(
            "UPDATE books SET
                title = ?3,
                author = ?4,
                total_pages = ?5,
                current_page = ?6,
                status = ?7,
                started_at = ?8,
                finished_at = ?9,
                notes = ?10
             WHERE id = ?1 AND user_id = ?2",
            params![
                book.id.to_string(),
                book.user_id.as_str(),
                book.title,
                book.author,
                book.total_pages,
                book.current_page,
                book.status.as_str(),
                book.started_at.map(|d| d.to_string()),
                book.finished_at.map(|d| d.to_string()),
                book.notes,
            ],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::BookNotFound {
                book_id: book.id.to_string(),
            });
        }

        tracing::debug!("Updated book: {} ({})", book.title, book.id);
        Ok(())
    }

    fn delete_book(&self, user_id: &UserId, book_id: &BookId) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute(
            "DELETE FROM books WHERE id = ?1 AND user_id = ?2",
            params![book_id.to_string(), user_id.as_str()],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::BookNotFound {
                book_id: book_id.to_string(),
            });
        }

        tracing::debug!("Deleted book: {}", book_id);
        Ok(())
    }

    fn create_digest(&self, digest: &WeeklyDigest) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO weekly_digests (id, user_id, week_start, content, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                digest.id.to_string(),
                digest.user_id.as_str(),
                digest.week_start.to_string(),
                digest.content,
                timestamp(&digest.created_at),
            ],
        )?;

        tracing::debug!("Stored digest {} for week of {}", digest.id, digest.week_start);
        Ok(())
    }

    fn list_digests(&self, user_id: &UserId, limit: u32) -> Result<Vec<WeeklyDigest>, StorageError> {
        let sql = format!(
            "SELECT {} FROM weekly_digests WHERE user_id = ?1
             ORDER BY week_start DESC, created_at DESC, rowid DESC
             LIMIT ?2",
            DIGEST_COLUMNS
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let digests = stmt
            .query_map(params![user_id.as_str(), limit], digest_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(digests)
    }
}

// Row conversion helpers

fn timestamp(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn invalid_column(index: usize, message: &str) -> rusqlite::Error {
    rusqlite::Error::InvalidColumnType(index, message.to_string(), rusqlite::types::Type::Text)
}

fn id_column<T>(
    row: &Row<'_>,
    index: usize,
    parse: fn(&str) -> Result<T, uuid::Error>,
) -> rusqlite::Result<T> {
    let raw: String = row.get(index)?;
    parse(&raw).map_err(|_| invalid_column(index, "Invalid UUID"))
}

fn user_column(row: &Row<'_>, index: usize) -> rusqlite::Result<UserId> {
    let raw: String = row.get(index)?;
    UserId::new(raw).map_err(|_| invalid_column(index, "Invalid user ID"))
}

fn timestamp_column(row: &Row<'_>, index: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(index)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| invalid_column(index, "Invalid datetime"))
}

fn day_column(row: &Row<'_>, index: usize) -> rusqlite::Result<DayKey> {
    let raw: String = row.get(index)?;
    DayKey::parse(&raw).map_err(|_| invalid_column(index, "Invalid date"))
}

fn optional_day_column(row: &Row<'_>, index: usize) -> rusqlite::Result<Option<DayKey>> {
    let raw: Option<String> = row.get(index)?;
    raw.map(|s| DayKey::parse(&s).map_err(|_| invalid_column(index, "Invalid date")))
        .transpose()
}

fn habit_from_row(row: &Row<'_>) -> rusqlite::Result<Habit> {
    let target_days_json: String = row.get(5)?;
    let target_days: TargetDays = serde_json::from_str(&target_days_json)
        .map_err(|_| invalid_column(5, "Invalid target days"))?;

    Ok(Habit::from_existing(
        id_column(row, 0, HabitId::from_string)?,
        user_column(row, 1)?,
        row.get(2)?, // name
        row.get(3)?, // icon
        row.get(4)?, // color
        target_days,
        timestamp_column(row, 6)?,
    ))
}

fn log_from_row(row: &Row<'_>) -> rusqlite::Result<HabitLog> {
    Ok(HabitLog::from_existing(
        id_column(row, 0, LogId::from_string)?,
        id_column(row, 1, HabitId::from_string)?,
        day_column(row, 2)?,
    ))
}

fn book_from_row(row: &Row<'_>) -> rusqlite::Result<Book> {
    let status_str: String = row.get(6)?;
    let status = BookStatus::parse(&status_str).map_err(|_| invalid_column(6, "Invalid book status"))?;

    Ok(Book::from_existing(
        id_column(row, 0, BookId::from_string)?,
        user_column(row, 1)?,
        row.get(2)?, // title
        row.get(3)?, // author
        row.get(4)?, // total_pages
        row.get(5)?, // current_page
        status,
        optional_day_column(row, 7)?,
        optional_day_column(row, 8)?,
        row.get(9)?, // notes
        timestamp_column(row, 10)?,
    ))
}

fn digest_from_row(row: &Row<'_>) -> rusqlite::Result<WeeklyDigest> {
    Ok(WeeklyDigest::from_existing(
        id_column(row, 0, DigestId::from_string)?,
        user_column(row, 1)?,
        day_column(row, 2)?,
        row.get(3)?, // content
        timestamp_column(row, 4)?,
    ))
}
