/// Book entity and reading progress
///
/// Books move through `want_to_read -> reading -> completed` (with `paused`
/// on the side); the start and finish days are stamped as the status changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{BookId, BookStatus, DayKey, DomainError, UserId};

/// Percentage of a book read, 0 to 100
///
/// Unknown or zero page counts read as 0 %. Being past the last page (e.g. an
/// appendix the total didn't include) still reads as 100 %.
pub fn reading_progress(current_page: u32, total_pages: Option<u32>) -> u8 {
    match total_pages {
        None | Some(0) => 0,
        Some(total) => {
            let percent = (f64::from(current_page) / f64::from(total) * 100.0).round();
            percent.min(100.0) as u8
        }
    }
}

/// A book the user is reading or plans to read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub user_id: UserId,
    pub title: String,
    pub author: Option<String>,
    pub total_pages: Option<u32>,
    pub current_page: u32,
    pub status: BookStatus,
    pub started_at: Option<DayKey>,
    pub finished_at: Option<DayKey>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Partial update of a book; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookUpdate {
    pub title: Option<String>,
    pub author: Option<String>,
    pub total_pages: Option<u32>,
    pub current_page: Option<u32>,
    pub status: Option<BookStatus>,
    pub notes: Option<String>,
}

impl Book {
    /// Add a book to the user's shelf
    ///
    /// Starts at page 0. Books added straight into `reading` are stamped as
    /// started `today`.
    pub fn new(
        user_id: UserId,
        title: String,
        author: Option<String>,
        total_pages: Option<u32>,
        status: Option<BookStatus>,
        today: DayKey,
    ) -> Result<Self, DomainError> {
        let title = title.trim().to_string();
        let author = normalize_optional(author);
        let status = status.unwrap_or_default();

        Self::validate_title(&title)?;
        Self::validate_total_pages(total_pages)?;

        Ok(Self {
            id: BookId::new(),
            user_id,
            title,
            author,
            total_pages,
            current_page: 0,
            status,
            started_at: (status == BookStatus::Reading).then_some(today),
            finished_at: None,
            notes: None,
            created_at: Utc::now(),
        })
    }

    /// Create a book from existing data (used when loading from database)
    #[allow(clippy::too_many_arguments)]
    pub fn from_existing(
        id: BookId,
        user_id: UserId,
        title: String,
        author: Option<String>,
        total_pages: Option<u32>,
        current_page: u32,
        status: BookStatus,
        started_at: Option<DayKey>,
        finished_at: Option<DayKey>,
        notes: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            title,
            author,
            total_pages,
            current_page,
            status,
            started_at,
            finished_at,
            notes,
            created_at,
        }
    }

    /// Percentage read, see [`reading_progress`]
    pub fn progress(&self) -> u8 {
        reading_progress(self.current_page, self.total_pages)
    }

    /// Apply a partial update, validating everything before changing anything
    ///
    /// Moving to `reading` stamps `started_at` unless the book was already
    /// started; moving to `completed` stamps `finished_at` and, unless the
    /// update sets a page itself, jumps to the last page.
    pub fn apply_update(&mut self, update: BookUpdate, today: DayKey) -> Result<(), DomainError> {
        let title = update.title.map(|t| t.trim().to_string());

        if let Some(ref new_title) = title {
            Self::validate_title(new_title)?;
        }
        if update.total_pages.is_some() {
            Self::validate_total_pages(update.total_pages)?;
        }
        if let Some(ref new_notes) = update.notes {
            Self::validate_notes(new_notes)?;
        }

        if let Some(new_title) = title {
            self.title = new_title;
        }
        if update.author.is_some() {
            self.author = normalize_optional(update.author);
        }
        if let Some(total) = update.total_pages {
            self.total_pages = Some(total);
        }
        if let Some(page) = update.current_page {
            self.current_page = page;
        }
        if let Some(status) = update.status {
            self.status = status;
            match status {
                BookStatus::Reading if self.started_at.is_none() => self.started_at = Some(today),
                BookStatus::Completed => {
                    self.finished_at = Some(today);
                    if update.current_page.is_none() {
                        self.current_page = self.total_pages.unwrap_or(self.current_page);
                    }
                }
                _ => {}
            }
        }
        if update.notes.is_some() {
            self.notes = normalize_optional(update.notes);
        }

        Ok(())
    }

    // Validation helper methods

    fn validate_title(title: &str) -> Result<(), DomainError> {
        if title.is_empty() {
            return Err(DomainError::Validation {
                message: "Book title cannot be empty".to_string(),
            });
        }
        if title.chars().count() > 200 {
            return Err(DomainError::Validation {
                message: "Book title cannot be longer than 200 characters".to_string(),
            });
        }
        Ok(())
    }

    fn validate_total_pages(total_pages: Option<u32>) -> Result<(), DomainError> {
        if total_pages == Some(0) {
            return Err(DomainError::InvalidValue {
                message: "Total pages must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    fn validate_notes(notes: &str) -> Result<(), DomainError> {
        if notes.chars().count() > 2000 {
            return Err(DomainError::InvalidValue {
                message: "Notes cannot be longer than 2000 characters".to_string(),
            });
        }
        Ok(())
    }
}

/// Blank strings are stored as absent
fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> UserId {
        UserId::new("reader").unwrap()
    }

    fn day(s: &str) -> DayKey {
        DayKey::parse(s).unwrap()
    }

    #[test]
    fn test_reading_progress() {
        assert_eq!(reading_progress(0, Some(0)), 0);
        assert_eq!(reading_progress(150, Some(300)), 50);
        assert_eq!(reading_progress(350, Some(300)), 100);
        assert_eq!(reading_progress(5, None), 0);
        assert_eq!(reading_progress(1, Some(3)), 33);
        assert_eq!(reading_progress(2, Some(3)), 67);
    }

    #[test]
    fn test_new_book_defaults() {
        let book = Book::new(user(), "Dune".to_string(), Some(" ".to_string()), Some(412), None, day("2024-01-01")).unwrap();
        assert_eq!(book.status, BookStatus::WantToRead);
        assert_eq!(book.current_page, 0);
        assert_eq!(book.author, None);
        assert_eq!(book.started_at, None);
        assert_eq!(book.progress(), 0);
    }

    #[test]
    fn test_new_reading_book_is_started_today() {
        let today = day("2024-02-10");
        let book = Book::new(user(), "Dune".to_string(), None, None, Some(BookStatus::Reading), today).unwrap();
        assert_eq!(book.started_at, Some(today));
    }

    #[test]
    fn test_invalid_book_fields() {
        let today = day("2024-02-10");
        assert!(Book::new(user(), "".to_string(), None, None, None, today).is_err());
        assert!(Book::new(user(), "Dune".to_string(), None, Some(0), None, today).is_err());
    }

    #[test]
    fn test_status_transitions_stamp_days() {
        let mut book = Book::new(user(), "Dune".to_string(), None, Some(400), None, day("2024-01-01")).unwrap();

        book.apply_update(
            BookUpdate { status: Some(BookStatus::Reading), ..Default::default() },
            day("2024-01-05"),
        )
        .unwrap();
        assert_eq!(book.started_at, Some(day("2024-01-05")));

        // Pausing and resuming keeps the original start day
        book.apply_update(BookUpdate { status: Some(BookStatus::Paused), ..Default::default() }, day("2024-01-10"))
            .unwrap();
        book.apply_update(BookUpdate { status: Some(BookStatus::Reading), ..Default::default() }, day("2024-01-20"))
            .unwrap();
        assert_eq!(book.started_at, Some(day("2024-01-05")));

        book.apply_update(
            BookUpdate { status: Some(BookStatus::Completed), current_page: Some(400), ..Default::default() },
            day("2024-02-01"),
        )
        .unwrap();
        assert_eq!(book.finished_at, Some(day("2024-02-01")));
        assert_eq!(book.progress(), 100);
    }

    #[test]
    fn test_completing_jumps_to_last_page() {
        let mut book = Book::new(user(), "Emma".to_string(), None, Some(300), None, day("2024-01-01")).unwrap();
        book.apply_update(BookUpdate { current_page: Some(120), ..Default::default() }, day("2024-01-02"))
            .unwrap();

        book.apply_update(BookUpdate { status: Some(BookStatus::Completed), ..Default::default() }, day("2024-01-09"))
            .unwrap();
        assert_eq!(book.current_page, 300);
        assert_eq!(book.progress(), 100);

        // Without a page count the page stays put
        let mut loose = Book::new(user(), "Notes".to_string(), None, None, None, day("2024-01-01")).unwrap();
        loose
            .apply_update(BookUpdate { current_page: Some(42), ..Default::default() }, day("2024-01-02"))
            .unwrap();
        loose
            .apply_update(BookUpdate { status: Some(BookStatus::Completed), ..Default::default() }, day("2024-01-03"))
            .unwrap();
        assert_eq!(loose.current_page, 42);
    }

    #[test]
    fn test_invalid_update_changes_nothing() {
        let mut book = Book::new(user(), "Dune".to_string(), None, Some(400), None, day("2024-01-01")).unwrap();
        let result = book.apply_update(
            BookUpdate { title: Some("  ".to_string()), current_page: Some(50), ..Default::default() },
            day("2024-01-02"),
        );
        assert!(result.is_err());
        assert_eq!(book.title, "Dune");
        assert_eq!(book.current_page, 0);
    }
}
