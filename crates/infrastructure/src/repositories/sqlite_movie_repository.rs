use async_trait::async_trait;
use domain::{DomainError, Movie, MovieRepository, Review};
use sqlx::sqlite::SqliteRow;
use sqlx::SqlitePool;
use std::time::Duration;
use uuid::Uuid;

use super::{column, parse_timestamp, parse_uuid, with_timeout};

pub struct SqliteMovieRepository {
    pool: SqlitePool,
    deadline: Duration,
}

impl SqliteMovieRepository {
    pub fn new(pool: SqlitePool, deadline: Duration) -> Self {
        Self { pool, deadline }
    }
}

fn movie_from_row(row: &SqliteRow) -> Result<Movie, DomainError> {
    let id: String = column(row, "id")?;
    let cast_json: String = column(row, "cast_members")?;
    let reviews_json: String = column(row, "reviews")?;
    let genre_id: Option<String> = column(row, "genre_id")?;
    let rating: f64 = column(row, "rating")?;
    let num_reviews: i64 = column(row, "num_reviews")?;
    let created_at: String = column(row, "created_at")?;
    let updated_at: String = column(row, "updated_at")?;

    let cast: Vec<String> = serde_json::from_str(&cast_json)
        .map_err(|e| DomainError::RepositoryError(format!("corrupt movie cast: {}", e)))?;
    let reviews: Vec<Review> = serde_json::from_str(&reviews_json)
        .map_err(|e| DomainError::RepositoryError(format!("corrupt movie reviews: {}", e)))?;
    let genre_id = genre_id
        .as_deref()
        .map(|raw| parse_uuid(raw, "genre"))
        .transpose()?;

    Ok(Movie {
        id: Some(parse_uuid(&id, "movie")?),
        name: column(row, "name")?,
        year: column(row, "year")?,
        detail: column(row, "detail")?,
        cast,
        genre_id,
        image: column(row, "image")?,
        rating: rating as f32,
        num_reviews: num_reviews as u32,
        reviews,
        revision: column(row, "revision")?,
        created_at: parse_timestamp(&created_at, "movie")?,
        updated_at: parse_timestamp(&updated_at, "movie")?,
    })
}

fn reviews_json(movie: &Movie) -> Result<String, DomainError> {
    serde_json::to_string(&movie.reviews)
        .map_err(|e| DomainError::RepositoryError(format!("encode movie reviews: {}", e)))
}

fn cast_json(movie: &Movie) -> Result<String, DomainError> {
    serde_json::to_string(&movie.cast)
        .map_err(|e| DomainError::RepositoryError(format!("encode movie cast: {}", e)))
}

#[async_trait]
impl MovieRepository for SqliteMovieRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Movie>, DomainError> {
        let row = with_timeout(
            self.deadline,
            "find movie by id",
            sqlx::query("SELECT * FROM movies WHERE id = ?")
                .bind(id.to_string())
                .fetch_optional(&self.pool),
        )
        .await?;

        row.as_ref().map(movie_from_row).transpose()
    }

    async fn find_all(&self) -> Result<Vec<Movie>, DomainError> {
        let rows = with_timeout(
            self.deadline,
            "list movies",
            sqlx::query("SELECT * FROM movies").fetch_all(&self.pool),
        )
        .await?;

        rows.iter().map(movie_from_row).collect()
    }

    async fn save(&self, movie: &Movie) -> Result<Movie, DomainError> {
        let mut saved = movie.clone();
        let id = saved.id.unwrap_or_else(Uuid::new_v4);
        saved.id = Some(id);

        with_timeout(
            self.deadline,
            "save movie",
            sqlx::query(
                "INSERT INTO movies (id, name, year, detail, cast_members, genre_id, image,
                                     rating, num_reviews, reviews, revision, created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(id.to_string())
            .bind(&saved.name)
            .bind(saved.year)
            .bind(&saved.detail)
            .bind(cast_json(&saved)?)
            .bind(saved.genre_id.map(|g| g.to_string()))
            .bind(&saved.image)
            .bind(f64::from(saved.rating))
            .bind(i64::from(saved.num_reviews))
            .bind(reviews_json(&saved)?)
            .bind(saved.revision)
            .bind(saved.created_at.to_rfc3339())
            .bind(saved.updated_at.to_rfc3339())
            .execute(&self.pool),
        )
        .await?;

        Ok(saved)
    }

    async fn update_guarded(&self, movie: &Movie) -> Result<Option<Movie>, DomainError> {
        let id = movie.id.ok_or_else(|| {
            DomainError::ValidationError("movie id required for update".to_string())
        })?;
        let next_revision = movie.revision + 1;

        // Conditional write: only lands if nobody bumped the revision since
        // the caller read the document.
        let result = with_timeout(
            self.deadline,
            "update movie",
            sqlx::query(
                "UPDATE movies SET name = ?, year = ?, detail = ?, cast_members = ?, genre_id = ?,
                                   image = ?, rating = ?, num_reviews = ?, reviews = ?,
                                   revision = ?, updated_at = ?
                 WHERE id = ? AND revision = ?",
            )
            .bind(&movie.name)
            .bind(movie.year)
            .bind(&movie.detail)
            .bind(cast_json(movie)?)
            .bind(movie.genre_id.map(|g| g.to_string()))
            .bind(&movie.image)
            .bind(f64::from(movie.rating))
            .bind(i64::from(movie.num_reviews))
            .bind(reviews_json(movie)?)
            .bind(next_revision)
            .bind(movie.updated_at.to_rfc3339())
            .bind(id.to_string())
            .bind(movie.revision)
            .execute(&self.pool),
        )
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        let mut saved = movie.clone();
        saved.revision = next_revision;
        Ok(Some(saved))
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        with_timeout(
            self.deadline,
            "delete movie",
            sqlx::query("DELETE FROM movies WHERE id = ?")
                .bind(id.to_string())
                .execute(&self.pool),
        )
        .await?;

        Ok(())
    }

    async fn find_newest(&self, limit: u32) -> Result<Vec<Movie>, DomainError> {
        let rows = with_timeout(
            self.deadline,
            "list newest movies",
            sqlx::query("SELECT * FROM movies ORDER BY created_at DESC LIMIT ?")
                .bind(i64::from(limit))
                .fetch_all(&self.pool),
        )
        .await?;

        rows.iter().map(movie_from_row).collect()
    }

    async fn find_most_reviewed(&self, limit: u32) -> Result<Vec<Movie>, DomainError> {
        let rows = with_timeout(
            self.deadline,
            "list most reviewed movies",
            sqlx::query("SELECT * FROM movies ORDER BY num_reviews DESC LIMIT ?")
                .bind(i64::from(limit))
                .fetch_all(&self.pool),
        )
        .await?;

        rows.iter().map(movie_from_row).collect()
    }

    async fn sample_random(&self, limit: u32) -> Result<Vec<Movie>, DomainError> {
        let rows = with_timeout(
            self.deadline,
            "sample movies",
            sqlx::query("SELECT * FROM movies ORDER BY RANDOM() LIMIT ?")
                .bind(i64::from(limit))
                .fetch_all(&self.pool),
        )
        .await?;

        rows.iter().map(movie_from_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;

    async fn repository() -> SqliteMovieRepository {
        let database = Database::connect("sqlite::memory:").await.unwrap();
        SqliteMovieRepository::new(database.pool().clone(), Duration::from_secs(5))
    }

    fn movie(name: &str) -> Movie {
        Movie::new(
            name.to_string(),
            1999,
            "detail".to_string(),
            vec!["lead".to_string()],
            None,
            None,
        )
    }

    #[tokio::test]
    async fn save_then_find_round_trips_embedded_reviews() {
        let repo = repository().await;

        let mut m = movie("The Matrix");
        m.add_review(Review::new(
            Uuid::new_v4(),
            "neo".to_string(),
            5,
            "whoa".to_string(),
        ))
        .unwrap();

        let saved = repo.save(&m).await.unwrap();
        let found = repo.find_by_id(saved.id.unwrap()).await.unwrap().unwrap();

        assert_eq!(found.name, "The Matrix");
        assert_eq!(found.reviews.len(), 1);
        assert_eq!(found.reviews[0].author, "neo");
        assert_eq!(found.num_reviews, 1);
        assert_eq!(found.rating, 5.0);
        assert_eq!(found.cast, vec!["lead".to_string()]);
    }

    #[tokio::test]
    async fn guarded_update_lands_once_per_revision() {
        let repo = repository().await;
        let saved = repo.save(&movie("Solaris")).await.unwrap();

        let mut first = saved.clone();
        first
            .add_review(Review::new(
                Uuid::new_v4(),
                "a".to_string(),
                4,
                "good".to_string(),
            ))
            .unwrap();

        // Second writer starts from the same revision.
        let mut second = saved.clone();
        second
            .add_review(Review::new(
                Uuid::new_v4(),
                "b".to_string(),
                2,
                "bad".to_string(),
            ))
            .unwrap();

        let landed = repo.update_guarded(&first).await.unwrap().unwrap();
        assert_eq!(landed.revision, saved.revision + 1);

        // The stale write must not land.
        assert!(repo.update_guarded(&second).await.unwrap().is_none());

        let stored = repo.find_by_id(saved.id.unwrap()).await.unwrap().unwrap();
        assert_eq!(stored.num_reviews, 1);
        assert_eq!(stored.reviews[0].author, "a");
    }

    #[tokio::test]
    async fn delete_removes_the_document() {
        let repo = repository().await;
        let saved = repo.save(&movie("Gone")).await.unwrap();
        let id = saved.id.unwrap();

        repo.delete(id).await.unwrap();
        assert!(repo.find_by_id(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn newest_is_ordered_and_capped() {
        let repo = repository().await;
        for i in 0..12i64 {
            let mut m = movie(&format!("movie-{}", i));
            // Spread creation times so the ordering is unambiguous.
            m.created_at = m.created_at - chrono::Duration::minutes(12 - i);
            repo.save(&m).await.unwrap();
        }

        let newest = repo.find_newest(10).await.unwrap();
        assert_eq!(newest.len(), 10);
        assert_eq!(newest[0].name, "movie-11");
        for pair in newest.windows(2) {
            assert!(pair[0].created_at >= pair[1].created_at);
        }
    }

    #[tokio::test]
    async fn most_reviewed_orders_by_count_not_rating() {
        let repo = repository().await;

        let mut crowd_pleaser = movie("crowd-pleaser");
        for i in 0..3 {
            crowd_pleaser
                .add_review(Review::new(
                    Uuid::new_v4(),
                    format!("user-{}", i),
                    2,
                    "eh".to_string(),
                ))
                .unwrap();
        }
        repo.save(&crowd_pleaser).await.unwrap();

        let mut critics_darling = movie("critics-darling");
        critics_darling
            .add_review(Review::new(
                Uuid::new_v4(),
                "critic".to_string(),
                5,
                "superb".to_string(),
            ))
            .unwrap();
        repo.save(&critics_darling).await.unwrap();

        let top = repo.find_most_reviewed(10).await.unwrap();
        assert_eq!(top[0].name, "crowd-pleaser");
        assert!(top[0].rating < top[1].rating);
    }

    #[tokio::test]
    async fn random_sample_is_distinct_and_capped() {
        let repo = repository().await;
        for i in 0..15 {
            repo.save(&movie(&format!("movie-{}", i))).await.unwrap();
        }

        let sample = repo.sample_random(10).await.unwrap();
        assert_eq!(sample.len(), 10);

        let mut ids: Vec<_> = sample.iter().map(|m| m.id.unwrap()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 10);
    }
}
