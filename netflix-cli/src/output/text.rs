//! Text output formatting with colors.

use chrono::{DateTime, Utc};
use netflix_core::{Profile, RatingKind, RatingRecord, ViewingHistoryItem};

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";

const STAR_FULL: char = '★';
const STAR_EMPTY: char = '☆';
const MAX_STARS: i64 = 5;

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// One line per profile; the active one is marked with `*`.
    pub fn format_profiles(&self, profiles: &[Profile]) -> String {
        if profiles.is_empty() {
            return self.dim("No profiles");
        }

        profiles
            .iter()
            .map(|p| {
                let marker = if p.is_active { self.green("*") } else { " ".to_string() };
                let kids = if p.is_kids { " [kids]" } else { "" };
                format!(
                    "{marker} {:<20} {}{kids}",
                    self.bold(&p.display_name),
                    self.dim(&p.guid)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// One line per rating: date, rating, title.
    pub fn format_ratings(&self, ratings: &[RatingRecord]) -> String {
        if ratings.is_empty() {
            return self.dim("No ratings");
        }

        ratings
            .iter()
            .map(|r| {
                format!(
                    "{}  {:<6} {} {}",
                    self.format_date(r.rated_at()),
                    self.format_rating(r.rating_type, r.your_rating),
                    r.title,
                    self.dim(&format!("({})", r.movie_id))
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// One line per viewing entry: date, then `Series: Episode` or the title.
    pub fn format_history(&self, items: &[ViewingHistoryItem]) -> String {
        if items.is_empty() {
            return self.dim("No viewing history");
        }

        items
            .iter()
            .map(|item| {
                let title = match &item.series_title {
                    Some(series) => format!("{}: {}", self.bold(series), item.title),
                    None => self.bold(&item.title),
                };
                format!(
                    "{}  {title} {}",
                    self.format_date(item.watched_at()),
                    self.dim(&format!("({})", item.movie_id))
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Renders a rating on its own scale.
    pub fn format_rating(&self, kind: Option<RatingKind>, rating: Option<i64>) -> String {
        let Some(rating) = rating else {
            return self.dim("-");
        };

        match kind {
            Some(RatingKind::Thumb) => match rating {
                0 => self.dim("none"),
                1 => self.red("down"),
                _ => self.green("up"),
            },
            Some(RatingKind::Star) => {
                let filled = usize::try_from(rating.clamp(0, MAX_STARS)).unwrap_or_default();
                let empty = usize::try_from(MAX_STARS).unwrap_or_default() - filled;
                let stars = format!(
                    "{}{}",
                    STAR_FULL.to_string().repeat(filled),
                    STAR_EMPTY.to_string().repeat(empty)
                );
                self.yellow(&stars)
            }
            Some(RatingKind::Unknown) | None => rating.to_string(),
        }
    }

    fn format_date(&self, at: Option<DateTime<Utc>>) -> String {
        match at {
            Some(at) => at.format("%Y-%m-%d").to_string(),
            None => self.dim("          "),
        }
    }

    // Color helpers

    fn bold(&self, s: &str) -> String {
        self.paint(BOLD, s)
    }

    fn dim(&self, s: &str) -> String {
        self.paint(DIM, s)
    }

    fn green(&self, s: &str) -> String {
        self.paint(GREEN, s)
    }

    fn red(&self, s: &str) -> String {
        self.paint(RED, s)
    }

    fn yellow(&self, s: &str) -> String {
        self.paint(YELLOW, s)
    }

    fn paint(&self, color: &str, s: &str) -> String {
        if self.use_colors {
            format!("{color}{s}{RESET}")
        } else {
            s.to_string()
        }
    }
}
