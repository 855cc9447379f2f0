use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::{Result, ScoutError};
use crate::models::{Property, Review, ReviewAuthor};
use crate::storage::{self, KeyValueStore};

const REVIEWS_KEY: &str = "reviews";

pub const MIN_COMMENT_CHARS: usize = 10;
pub const MAX_COMMENT_CHARS: usize = 1000;
pub const MAX_TITLE_CHARS: usize = 100;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReviewSort {
    #[default]
    Newest,
    Oldest,
    HighestRated,
    LowestRated,
    MostHelpful,
}

impl FromStr for ReviewSort {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "newest" | "date" => Ok(ReviewSort::Newest),
            "oldest" => Ok(ReviewSort::Oldest),
            "highest" | "highest_rated" | "rating" => Ok(ReviewSort::HighestRated),
            "lowest" | "lowest_rated" => Ok(ReviewSort::LowestRated),
            "helpful" | "most_helpful" => Ok(ReviewSort::MostHelpful),
            other => Err(format!("unknown review order: {other}")),
        }
    }
}

impl fmt::Display for ReviewSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReviewSort::Newest => "newest",
            ReviewSort::Oldest => "oldest",
            ReviewSort::HighestRated => "highest",
            ReviewSort::LowestRated => "lowest",
            ReviewSort::MostHelpful => "helpful",
        };
        f.write_str(name)
    }
}

/// Input for a new review
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReview {
    pub property_id: String,
    pub author: ReviewAuthor,
    pub rating: u8,
    #[serde(default)]
    pub title: String,
    pub comment: String,
    #[serde(default)]
    pub verified: bool,
}

/// Fields left as `None` are unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewUpdate {
    pub rating: Option<u8>,
    pub title: Option<String>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReviewSummary {
    pub property_id: String,
    pub count: usize,
    /// Rounded to one decimal, 0.0 without reviews
    pub average: f32,
    /// Index 0 holds 1-star counts, index 4 holds 5-star counts
    pub distribution: [usize; 5],
}

fn validate_rating(rating: u8) -> Result<()> {
    if (1..=5).contains(&rating) {
        Ok(())
    } else {
        Err(ScoutError::InvalidRating(rating))
    }
}

/// Titles are optional; blank input is stored as an empty string
fn validate_title(title: &str) -> Result<String> {
    let title = title.trim();
    let len = title.chars().count();
    if len > MAX_TITLE_CHARS {
        return Err(ScoutError::TitleTooLong(len));
    }
    Ok(title.to_string())
}

fn validate_comment(comment: &str) -> Result<String> {
    let comment = comment.trim();
    let len = comment.chars().count();
    if !(MIN_COMMENT_CHARS..=MAX_COMMENT_CHARS).contains(&len) {
        return Err(ScoutError::CommentLength(len));
    }
    Ok(comment.to_string())
}

/// Mean rating rounded to one decimal
pub fn average_rating(reviews: &[Review]) -> f32 {
    if reviews.is_empty() {
        return 0.0;
    }
    let sum: u32 = reviews.iter().map(|r| u32::from(r.rating)).sum();
    let mean = sum as f32 / reviews.len() as f32;
    (mean * 10.0).round() / 10.0
}

/// Stable sort; rating and helpfulness ties fall back to newest first
pub fn sort_reviews(reviews: &mut [Review], sort: ReviewSort) {
    match sort {
        ReviewSort::Newest => reviews.sort_by_key(|r| Reverse(r.created_at)),
        ReviewSort::Oldest => reviews.sort_by_key(|r| r.created_at),
        ReviewSort::HighestRated => {
            reviews.sort_by_key(|r| (Reverse(r.rating), Reverse(r.created_at)))
        }
        ReviewSort::LowestRated => reviews.sort_by_key(|r| (r.rating, Reverse(r.created_at))),
        ReviewSort::MostHelpful => {
            reviews.sort_by_key(|r| (Reverse(r.helpful), Reverse(r.created_at)))
        }
    }
}

pub fn summarize(property_id: &str, reviews: &[Review]) -> ReviewSummary {
    let mut distribution = [0usize; 5];
    for review in reviews {
        if let Some(slot) = usize::from(review.rating)
            .checked_sub(1)
            .and_then(|i| distribution.get_mut(i))
        {
            *slot += 1;
        }
    }

    ReviewSummary {
        property_id: property_id.to_string(),
        count: reviews.len(),
        average: average_rating(reviews),
        distribution,
    }
}

/// Overlay live review stats onto a listing. Listings without posted
/// reviews keep their own rating and count.
pub fn with_review_stats(mut property: Property, summary: &ReviewSummary) -> Property {
    if summary.count > 0 {
        property.rating = summary.average;
        property.review_count = u32::try_from(summary.count).unwrap_or(u32::MAX);
    }
    property
}

/// Review CRUD over a single persisted blob
pub struct ReviewService {
    store: Arc<dyn KeyValueStore>,
}

impl ReviewService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    async fn load_all(&self) -> Result<Vec<Review>> {
        Ok(storage::load_json(self.store.as_ref(), REVIEWS_KEY)
            .await?
            .unwrap_or_default())
    }

    async fn save_all(&self, reviews: &[Review]) -> Result<()> {
        storage::save_json(self.store.as_ref(), REVIEWS_KEY, &reviews).await
    }

    fn not_found(id: &str) -> ScoutError {
        ScoutError::NotFound {
            kind: "review",
            id: id.to_string(),
        }
    }

    pub async fn list_for_property(
        &self,
        property_id: &str,
        sort: ReviewSort,
    ) -> Result<Vec<Review>> {
        let mut reviews: Vec<Review> = self
            .load_all()
            .await?
            .into_iter()
            .filter(|r| r.property_id == property_id)
            .collect();
        sort_reviews(&mut reviews, sort);
        Ok(reviews)
    }

    pub async fn create(&self, new: NewReview) -> Result<Review> {
        validate_rating(new.rating)?;
        let title = validate_title(&new.title)?;
        let comment = validate_comment(&new.comment)?;

        let review = Review {
            id: Uuid::new_v4().to_string(),
            property_id: new.property_id,
            author: new.author,
            rating: new.rating,
            title,
            comment,
            created_at: Utc::now(),
            verified: new.verified,
            helpful: 0,
        };

        let mut reviews = self.load_all().await?;
        reviews.push(review.clone());
        self.save_all(&reviews).await?;

        info!("📝 Saved review {} for {}", review.id, review.property_id);
        Ok(review)
    }

    pub async fn update(&self, id: &str, update: ReviewUpdate) -> Result<Review> {
        let mut reviews = self.load_all().await?;
        let review = reviews
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| Self::not_found(id))?;

        if let Some(rating) = update.rating {
            validate_rating(rating)?;
            review.rating = rating;
        }
        if let Some(title) = update.title.as_deref() {
            review.title = validate_title(title)?;
        }
        if let Some(comment) = update.comment.as_deref() {
            review.comment = validate_comment(comment)?;
        }

        let updated = review.clone();
        self.save_all(&reviews).await?;
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let mut reviews = self.load_all().await?;
        let before = reviews.len();
        reviews.retain(|r| r.id != id);
        if reviews.len() == before {
            return Err(Self::not_found(id));
        }
        self.save_all(&reviews).await
    }

    /// Returns the new helpful count
    pub async fn mark_helpful(&self, id: &str) -> Result<u32> {
        let mut reviews = self.load_all().await?;
        let review = reviews
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| Self::not_found(id))?;
        review.helpful = review.helpful.saturating_add(1);
        let helpful = review.helpful;
        self.save_all(&reviews).await?;
        Ok(helpful)
    }

    pub async fn summary(&self, property_id: &str) -> Result<ReviewSummary> {
        let reviews = self
            .list_for_property(property_id, ReviewSort::default())
            .await?;
        Ok(summarize(property_id, &reviews))
    }
}
