/// Habit entity and related functionality
///
/// This module defines the core Habit struct that represents something a user
/// wants to do regularly, along with validation and the derived per-habit
/// statistics shown on the dashboard.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, HabitId, TargetDays, UserId};

/// Icon given to habits created without one
pub const DEFAULT_ICON: &str = "✅";

/// Colour given to habits created without one
pub const DEFAULT_COLOR: &str = "#22c55e";

/// A habit a user wants to track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    /// Unique identifier for this habit
    pub id: HabitId,
    /// Owner of the habit
    pub user_id: UserId,
    /// Display name (e.g., "Morning Run", "Read for 30min")
    pub name: String,
    /// Short emoji or glyph shown next to the name
    pub icon: String,
    /// Hex colour used when rendering the habit
    pub color: String,
    /// Weekdays the habit is expected on
    pub target_days: TargetDays,
    /// When this habit was created
    pub created_at: DateTime<Utc>,
}

impl Habit {
    /// Create a new habit with validation
    ///
    /// Missing icon, colour and target days fall back to the defaults.
    pub fn new(
        user_id: UserId,
        name: String,
        icon: Option<String>,
        color: Option<String>,
        target_days: Option<TargetDays>,
    ) -> Result<Self, DomainError> {
        let name = name.trim().to_string();
        let icon = icon.unwrap_or_else(|| DEFAULT_ICON.to_string());
        let color = color.unwrap_or_else(|| DEFAULT_COLOR.to_string());

        Self::validate_name(&name)?;
        Self::validate_icon(&icon)?;
        Self::validate_color(&color)?;

        Ok(Self {
            id: HabitId::new(),
            user_id,
            name,
            icon,
            color,
            target_days: target_days.unwrap_or_default(),
            created_at: Utc::now(),
        })
    }

    /// Create a habit from existing data (used when loading from database)
    ///
    /// This constructor assumes data is already validated.
    pub fn from_existing(
        id: HabitId,
        user_id: UserId,
        name: String,
        icon: String,
        color: String,
        target_days: TargetDays,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            name,
            icon,
            color,
            target_days,
            created_at,
        }
    }

    /// Update the habit's properties with validation
    ///
    /// Nothing is applied unless every provided value is valid.
    pub fn update(
        &mut self,
        name: Option<String>,
        icon: Option<String>,
        color: Option<String>,
        target_days: Option<TargetDays>,
    ) -> Result<(), DomainError> {
        let name = name.map(|n| n.trim().to_string());

        if let Some(ref new_name) = name {
            Self::validate_name(new_name)?;
        }
        if let Some(ref new_icon) = icon {
            Self::validate_icon(new_icon)?;
        }
        if let Some(ref new_color) = color {
            Self::validate_color(new_color)?;
        }

        if let Some(new_name) = name {
            self.name = new_name;
        }
        if let Some(new_icon) = icon {
            self.icon = new_icon;
        }
        if let Some(new_color) = color {
            self.color = new_color;
        }
        if let Some(new_target_days) = target_days {
            self.target_days = new_target_days;
        }

        Ok(())
    }

    // Validation helper methods

    fn validate_name(name: &str) -> Result<(), DomainError> {
        if name.is_empty() {
            return Err(DomainError::InvalidHabitName(
                "Habit name cannot be empty".to_string(),
            ));
        }

        if name.chars().count() > 100 {
            return Err(DomainError::InvalidHabitName(
                "Habit name cannot be longer than 100 characters".to_string(),
            ));
        }

        Ok(())
    }

    fn validate_icon(icon: &str) -> Result<(), DomainError> {
        let trimmed = icon.trim();
        if trimmed.is_empty() || trimmed.chars().count() > 16 {
            return Err(DomainError::InvalidValue {
                message: "Icon must be between 1 and 16 characters".to_string(),
            });
        }
        Ok(())
    }

    /// Colours are `#rgb` or `#rrggbb`
    fn validate_color(color: &str) -> Result<(), DomainError> {
        let valid = match color.strip_prefix('#') {
            Some(hex) => (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit()),
            None => false,
        };

        if !valid {
            return Err(DomainError::InvalidValue {
                message: format!("Color must be a hex value like #22c55e, got '{}'", color),
            });
        }
        Ok(())
    }
}

/// A habit together with its derived completion stats
///
/// Computed fresh from the logs every time; never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HabitWithStats {
    #[serde(flatten)]
    pub habit: Habit,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub completed_today: bool,
}
