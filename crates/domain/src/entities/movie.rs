use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::DomainError;

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

/// A review lives inside its movie document and has no lifecycle of its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    pub user_id: Uuid,
    pub author: String,
    pub rating: u8,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl Review {
    pub fn new(user_id: Uuid, author: String, rating: u8, comment: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            author,
            rating,
            comment,
            created_at: Utc::now(),
        }
    }
}

/// Catalog entry owning its embedded review sequence. `rating` and
/// `num_reviews` are derived from the sequence and must never be set
/// independently; every mutation goes through the recompute below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: Option<Uuid>,
    pub name: String,
    pub year: i32,
    pub detail: String,
    pub cast: Vec<String>,
    pub genre_id: Option<Uuid>,
    pub image: Option<String>,
    pub rating: f32,
    pub num_reviews: u32,
    pub reviews: Vec<Review>,
    pub revision: i64, // conditional-write guard, bumped by the store
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Movie {
    pub fn new(
        name: String,
        year: i32,
        detail: String,
        cast: Vec<String>,
        genre_id: Option<Uuid>,
        image: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            name,
            year,
            detail,
            cast,
            genre_id,
            image,
            rating: 0.0,
            num_reviews: 0,
            reviews: Vec::new(),
            revision: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "Movie name cannot be empty".to_string(),
            ));
        }

        if self.detail.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "Movie detail cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Append a review and recompute the derived fields. A user id appears
    /// at most once in the sequence.
    pub fn add_review(&mut self, review: Review) -> Result<(), DomainError> {
        if review.rating < MIN_RATING || review.rating > MAX_RATING {
            return Err(DomainError::ValidationError(format!(
                "Rating must be between {} and {}",
                MIN_RATING, MAX_RATING
            )));
        }

        if self.reviews.iter().any(|r| r.user_id == review.user_id) {
            return Err(DomainError::Conflict("Movie already reviewed".to_string()));
        }

        self.reviews.push(review);
        self.recompute_review_totals();
        Ok(())
    }

    /// Remove a review by its id and recompute the derived fields.
    pub fn remove_review(&mut self, review_id: Uuid) -> Result<(), DomainError> {
        let index = self
            .reviews
            .iter()
            .position(|r| r.id == review_id)
            .ok_or_else(|| DomainError::NotFound(format!("Review not found: {}", review_id)))?;

        self.reviews.remove(index);
        self.recompute_review_totals();
        Ok(())
    }

    fn recompute_review_totals(&mut self) {
        self.num_reviews = self.reviews.len() as u32;
        self.rating = if self.reviews.is_empty() {
            0.0
        } else {
            let sum: u32 = self.reviews.iter().map(|r| u32::from(r.rating)).sum();
            sum as f32 / self.reviews.len() as f32
        };
        self.updated_at = Utc::now();
    }
}
