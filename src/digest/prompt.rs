/// Digest prompt construction

use crate::domain::{Book, BookStatus, DayKey};

/// One habit's numbers for the summarized week
#[derive(Debug, Clone, PartialEq)]
pub struct HabitWeekLine {
    pub icon: String,
    pub name: String,
    /// Days completed within the week, 0 to 7
    pub days_completed: u32,
    pub current_streak: u32,
}

/// Everything the prompt is built from
#[derive(Debug, Clone)]
pub struct DigestPromptInput<'a> {
    pub week_start: DayKey,
    pub week_end: DayKey,
    pub habits: Vec<HabitWeekLine>,
    /// All of the user's books; the prompt picks the relevant ones
    pub books: &'a [Book],
}

/// Render the user message for a weekly digest request
pub fn build_digest_prompt(input: &DigestPromptInput<'_>) -> String {
    let habit_summary = input
        .habits
        .iter()
        .map(|h| {
            format!(
                "- {} {}: {}/7 days, streak: {} days",
                h.icon, h.name, h.days_completed, h.current_streak
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let book_summary = input
        .books
        .iter()
        .filter(|b| b.status == BookStatus::Reading)
        .map(|b| {
            let total = b
                .total_pages
                .map(|t| t.to_string())
                .unwrap_or_else(|| "?".to_string());
            format!(
                "- \"{}\": {}% complete (page {}/{})",
                b.title,
                b.progress(),
                b.current_page,
                total
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let completed_summary = input
        .books
        .iter()
        .filter(|b| b.status == BookStatus::Completed)
        .filter(|b| b.finished_at.is_some_and(|finished| finished >= input.week_start))
        .map(|b| {
            format!(
                "- \"{}\" by {}",
                b.title,
                b.author.as_deref().unwrap_or("Unknown")
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Generate a weekly progress summary for the week of {} to {}.\n\
         \n\
         HABITS:\n\
         {}\n\
         \n\
         READING PROGRESS:\n\
         {}\n\
         \n\
         BOOKS COMPLETED THIS WEEK:\n\
         {}\n\
         \n\
         Please provide:\n\
         1. A brief overview of the week\n\
         2. Highlight any achievements (long streaks, completed books)\n\
         3. Areas for improvement\n\
         4. One actionable tip for next week",
        human_date(input.week_start),
        human_date(input.week_end),
        or_fallback(habit_summary, "No habits tracked yet."),
        or_fallback(book_summary, "No books currently being read."),
        or_fallback(completed_summary, "None"),
    )
}

/// e.g. `Mon May 13 2024`
fn human_date(day: DayKey) -> String {
    day.date().format("%a %b %d %Y").to_string()
}

fn or_fallback(section: String, fallback: &str) -> String {
    if section.is_empty() {
        fallback.to_string()
    } else {
        section
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BookUpdate, UserId};

    fn day(s: &str) -> DayKey {
        DayKey::parse(s).unwrap()
    }

    fn user() -> UserId {
        UserId::new("user-1").unwrap()
    }

    #[test]
    fn test_empty_week_uses_fallbacks() {
        let prompt = build_digest_prompt(&DigestPromptInput {
            week_start: day("2024-05-13"),
            week_end: day("2024-05-19"),
            habits: vec![],
            books: &[],
        });

        assert!(prompt.starts_with(
            "Generate a weekly progress summary for the week of Mon May 13 2024 to Sun May 19 2024."
        ));
        assert!(prompt.contains("HABITS:\nNo habits tracked yet.\n"));
        assert!(prompt.contains("READING PROGRESS:\nNo books currently being read.\n"));
        assert!(prompt.contains("BOOKS COMPLETED THIS WEEK:\nNone\n"));
        assert!(prompt.ends_with("4. One actionable tip for next week"));
    }

    #[test]
    fn test_habit_and_book_lines() {
        let today = day("2024-05-15");
        let mut dune = Book::new(user(), "Dune".to_string(), None, Some(400), Some(BookStatus::Reading), today).unwrap();
        dune.apply_update(BookUpdate { current_page: Some(100), ..Default::default() }, today).unwrap();

        let untracked = Book::new(user(), "Notes".to_string(), None, None, Some(BookStatus::Reading), today).unwrap();

        let mut emma = Book::new(user(), "Emma".to_string(), Some("Jane Austen".to_string()), None, None, today).unwrap();
        emma.apply_update(BookUpdate { status: Some(BookStatus::Completed), ..Default::default() }, today).unwrap();

        let mut old = Book::new(user(), "Old".to_string(), None, None, None, today).unwrap();
        old.apply_update(BookUpdate { status: Some(BookStatus::Completed), ..Default::default() }, day("2024-05-01")).unwrap();

        let books = vec![dune, untracked, emma, old];
        let prompt = build_digest_prompt(&DigestPromptInput {
            week_start: day("2024-05-13"),
            week_end: day("2024-05-19"),
            habits: vec![HabitWeekLine {
                icon: "🏃".to_string(),
                name: "Run".to_string(),
                days_completed: 3,
                current_streak: 2,
            }],
            books: &books,
        });

        assert!(prompt.contains("- 🏃 Run: 3/7 days, streak: 2 days"));
        assert!(prompt.contains("- \"Dune\": 25% complete (page 100/400)"));
        assert!(prompt.contains("- \"Notes\": 0% complete (page 0/?)"));
        assert!(prompt.contains("- \"Emma\" by Jane Austen"));
        assert!(!prompt.contains("\"Old\""));
    }
}
