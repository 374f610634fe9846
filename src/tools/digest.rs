/// Tools for weekly digests
///
/// digest_generate summarizes the current ISO week with the configured text
/// generator and stores the result; digest_list shows the latest ones.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::digest::{
    build_digest_prompt, DigestError, DigestPromptInput, HabitWeekLine, TextGenerator,
    SYSTEM_PROMPT,
};
use crate::domain::{week_end_for, week_start_for, WeeklyDigest, DIGEST_HISTORY_LIMIT};
use crate::storage::HabitFlowStore;
use crate::tools::{ToolContext, ToolError};

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct GenerateDigestParams {}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListDigestsParams {}

#[derive(Debug, Serialize)]
pub struct DigestResponse {
    pub digest: WeeklyDigest,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ListDigestsResponse {
    pub digests: Vec<WeeklyDigest>,
    pub message: String,
}

/// Generate and store a digest for the week containing today
///
/// Nothing is stored when generation fails.
pub async fn generate_digest<S: HabitFlowStore>(
    ctx: &ToolContext<'_, S>,
    generator: Option<&dyn TextGenerator>,
    _params: GenerateDigestParams,
) -> Result<DigestResponse, ToolError> {
    let generator = generator.ok_or_else(|| {
        DigestError::NotConfigured("no OpenAI API key was provided".to_string())
    })?;

    let today = ctx.analytics.today();
    let week_start = week_start_for(today);
    let week_end = week_end_for(today);

    let habits = ctx.storage.list_habits(ctx.user)?;
    let logs = ctx.storage.list_logs(ctx.user)?;
    let books = ctx.storage.list_books(ctx.user, None)?;

    let habit_lines = ctx
        .analytics
        .habits_with_stats(habits, &logs, today)
        .into_iter()
        .map(|h| HabitWeekLine {
            days_completed: ctx
                .analytics
                .completions_between(&h.habit, &logs, week_start, week_end),
            current_streak: h.current_streak,
            icon: h.habit.icon,
            name: h.habit.name,
        })
        .collect();

    let prompt = build_digest_prompt(&DigestPromptInput {
        week_start,
        week_end,
        habits: habit_lines,
        books: &books,
    });
    tracing::debug!("Digest prompt:\n{}", prompt);

    let content = generator.complete(SYSTEM_PROMPT, &prompt).await.map_err(|e| {
        tracing::warn!("Weekly digest generation failed: {}", e);
        e
    })?;

    let digest = WeeklyDigest::new(ctx.user.clone(), week_start, content);
    ctx.storage.create_digest(&digest)?;
    tracing::info!("Stored weekly digest for week of {}", week_start);

    let message = format!("📝 **Weekly digest ({} to {})**\n\n{}", week_start, week_end, digest.content);
    Ok(DigestResponse { digest, message })
}

/// The most recent digests, newest week first
pub fn list_digests<S: HabitFlowStore>(
    ctx: &ToolContext<'_, S>,
    _params: ListDigestsParams,
) -> Result<ListDigestsResponse, ToolError> {
    let digests = ctx.storage.list_digests(ctx.user, DIGEST_HISTORY_LIMIT)?;

    let message = if digests.is_empty() {
        "No digests yet. Generate one with digest_generate!".to_string()
    } else {
        digests
            .iter()
            .map(|d| format!("## Week of {}\n\n{}", d.week_start, d.content))
            .collect::<Vec<_>>()
            .join("\n\n---\n\n")
    };

    Ok(ListDigestsResponse { digests, message })
}
