/// Tools for the reading list
///
/// This module implements book_create, book_list, book_update,
/// book_progress and book_delete.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{Book, BookStatus, BookUpdate};
use crate::storage::HabitFlowStore;
use crate::tools::{parse_book_id, ToolContext, ToolError};

/// A book together with its reading progress
#[derive(Debug, Clone, Serialize)]
pub struct BookView {
    #[serde(flatten)]
    pub book: Book,
    /// Percent read, 0 to 100
    pub progress: u8,
}

impl From<Book> for BookView {
    fn from(book: Book) -> Self {
        let progress = book.progress();
        Self { book, progress }
    }
}

#[derive(Debug, Serialize)]
pub struct BookResponse {
    pub book: BookView,
    pub message: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateBookParams {
    pub title: String,
    pub author: Option<String>,
    pub total_pages: Option<u32>,
    /// want_to_read (default), reading, paused or completed
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListBooksParams {
    /// Only books with this status
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListBooksResponse {
    pub books: Vec<BookView>,
    pub message: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateBookParams {
    pub book_id: String,
    pub title: Option<String>,
    pub author: Option<String>,
    pub total_pages: Option<u32>,
    pub current_page: Option<u32>,
    /// want_to_read, reading, paused or completed
    pub status: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct BookProgressParams {
    pub book_id: String,
    /// Page the reader is on now
    pub current_page: u32,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DeleteBookParams {
    pub book_id: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteBookResponse {
    pub book_id: String,
    pub message: String,
}

fn parse_status(raw: Option<String>) -> Result<Option<BookStatus>, ToolError> {
    raw.map(|s| BookStatus::parse(&s)).transpose().map_err(ToolError::from)
}

fn describe(view: &BookView) -> String {
    let pages = match view.book.total_pages {
        Some(total) => format!("page {}/{}", view.book.current_page, total),
        None => format!("page {}/?", view.book.current_page),
    };
    format!(
        "📖 **{}**{} [{}] {}% ({})\n   ID: {}",
        view.book.title,
        view.book
            .author
            .as_deref()
            .map(|a| format!(" by {}", a))
            .unwrap_or_default(),
        view.book.status.display_name(),
        view.progress,
        pages,
        view.book.id
    )
}

/// Add a book to the user's list
pub fn create_book<S: HabitFlowStore>(
    ctx: &ToolContext<'_, S>,
    params: CreateBookParams,
) -> Result<BookResponse, ToolError> {
    let status = parse_status(params.status)?;
    let book = Book::new(
        ctx.user.clone(),
        params.title,
        params.author,
        params.total_pages,
        status,
        ctx.analytics.today(),
    )?;

    ctx.storage.create_book(&book)?;
    tracing::info!("Added book '{}' for {}", book.title, ctx.user);

    let view = BookView::from(book);
    let message = format!("📚 Added book\n{}", describe(&view));
    Ok(BookResponse { book: view, message })
}

/// List the user's books, newest first
pub fn list_books<S: HabitFlowStore>(
    ctx: &ToolContext<'_, S>,
    params: ListBooksParams,
) -> Result<ListBooksResponse, ToolError> {
    let status = parse_status(params.status)?;
    let books: Vec<BookView> = ctx
        .storage
        .list_books(ctx.user, status)?
        .into_iter()
        .map(BookView::from)
        .collect();

    let message = if books.is_empty() {
        "No books found. Add one with book_create!".to_string()
    } else {
        format!(
            "📚 **Books** ({})\n\n{}",
            books.len(),
            books.iter().map(describe).collect::<Vec<_>>().join("\n\n")
        )
    };

    Ok(ListBooksResponse { books, message })
}

/// Change any subset of a book's fields
pub fn update_book<S: HabitFlowStore>(
    ctx: &ToolContext<'_, S>,
    params: UpdateBookParams,
) -> Result<BookResponse, ToolError> {
    let book_id = parse_book_id(&params.book_id)?;
    let update = BookUpdate {
        title: params.title,
        author: params.author,
        total_pages: params.total_pages,
        current_page: params.current_page,
        status: parse_status(params.status)?,
        notes: params.notes,
    };

    if update == BookUpdate::default() {
        return Err(ToolError::InvalidParams("Nothing to update".to_string()));
    }

    apply(ctx, &book_id, update, "✏️ Updated book")
}

/// Record the page the reader has reached
pub fn update_progress<S: HabitFlowStore>(
    ctx: &ToolContext<'_, S>,
    params: BookProgressParams,
) -> Result<BookResponse, ToolError> {
    let book_id = parse_book_id(&params.book_id)?;
    let update = BookUpdate {
        current_page: Some(params.current_page),
        ..Default::default()
    };

    apply(ctx, &book_id, update, "🔖 Progress saved")
}

fn apply<S: HabitFlowStore>(
    ctx: &ToolContext<'_, S>,
    book_id: &crate::domain::BookId,
    update: BookUpdate,
    headline: &str,
) -> Result<BookResponse, ToolError> {
    let mut book = ctx.storage.get_book(ctx.user, book_id)?;
    book.apply_update(update, ctx.analytics.today())?;
    ctx.storage.update_book(&book)?;

    let view = BookView::from(book);
    let message = format!("{}\n{}", headline, describe(&view));
    Ok(BookResponse { book: view, message })
}

/// Remove a book from the list
pub fn delete_book<S: HabitFlowStore>(
    ctx: &ToolContext<'_, S>,
    params: DeleteBookParams,
) -> Result<DeleteBookResponse, ToolError> {
    let book_id = parse_book_id(&params.book_id)?;
    let book = ctx.storage.get_book(ctx.user, &book_id)?;
    ctx.storage.delete_book(ctx.user, &book_id)?;

    Ok(DeleteBookResponse {
        book_id: book_id.to_string(),
        message: format!("🗑️ Removed '{}' from your books", book.title),
    })
}
