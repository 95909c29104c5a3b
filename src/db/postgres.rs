use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool};
use uuid::Uuid;

use crate::{
    db::CatalogStore,
    error::AppResult,
    models::{Comment, Content, MediaKind, NewComment, NewContent},
};

/// Creates a PostgreSQL connection pool and applies pending migrations
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

const CONTENT_COLUMNS: &str = "id, tmdb_id, title, name, overview, release_date, first_air_date, \
     poster_path, poster_url, backdrop_path, genre_ids, popularity, vote_average, vote_count, \
     adult, media_type, year, my_note, my_rating, tags, created_at, updated_at";

#[derive(Debug, FromRow)]
struct ContentRow {
    id: Uuid,
    tmdb_id: String,
    title: String,
    name: String,
    overview: String,
    release_date: String,
    first_air_date: String,
    poster_path: String,
    poster_url: String,
    backdrop_path: String,
    genre_ids: Vec<i32>,
    popularity: Option<f64>,
    vote_average: Option<f64>,
    vote_count: Option<i64>,
    adult: Option<bool>,
    media_type: String,
    year: String,
    my_note: String,
    my_rating: f64,
    tags: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ContentRow> for Content {
    fn from(row: ContentRow) -> Self {
        Content {
            id: row.id,
            tmdb_id: row.tmdb_id,
            title: row.title,
            name: row.name,
            overview: row.overview,
            release_date: row.release_date,
            first_air_date: row.first_air_date,
            poster_path: row.poster_path,
            poster_url: row.poster_url,
            backdrop_path: row.backdrop_path,
            genre_ids: row.genre_ids,
            popularity: row.popularity,
            vote_average: row.vote_average,
            vote_count: row.vote_count,
            adult: row.adult,
            media_type: row.media_type.parse::<MediaKind>().unwrap_or_default(),
            year: row.year,
            my_note: row.my_note,
            my_rating: row.my_rating,
            tags: row.tags,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct CommentRow {
    id: Uuid,
    content_id: Uuid,
    nickname: String,
    text: String,
    created_at: DateTime<Utc>,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Comment {
            id: row.id,
            content_id: row.content_id,
            nickname: row.nickname,
            text: row.text,
            created_at: row.created_at,
        }
    }
}

/// PostgreSQL-backed catalog store
#[derive(Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl CatalogStore for PgCatalogStore {
    async fn list_contents(&self) -> AppResult<Vec<Content>> {
        let sql = format!(
            "SELECT {} FROM contents ORDER BY created_at DESC",
            CONTENT_COLUMNS
        );
        let rows: Vec<ContentRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Content::from).collect())
    }

    async fn get_content(&self, id: Uuid) -> AppResult<Option<Content>> {
        let sql = format!("SELECT {} FROM contents WHERE id = $1", CONTENT_COLUMNS);
        let row: Option<ContentRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Content::from))
    }

    async fn create_content(&self, input: NewContent) -> AppResult<Content> {
        let content = Content::new(input);
        let sql = format!(
            "INSERT INTO contents ({}) VALUES \
             ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, $21, $22) \
             RETURNING {}",
            CONTENT_COLUMNS, CONTENT_COLUMNS
        );

        let row: ContentRow = sqlx::query_as(&sql)
            .bind(content.id)
            .bind(&content.tmdb_id)
            .bind(&content.title)
            .bind(&content.name)
            .bind(&content.overview)
            .bind(&content.release_date)
            .bind(&content.first_air_date)
            .bind(&content.poster_path)
            .bind(&content.poster_url)
            .bind(&content.backdrop_path)
            .bind(&content.genre_ids)
            .bind(content.popularity)
            .bind(content.vote_average)
            .bind(content.vote_count)
            .bind(content.adult)
            .bind(content.media_type.as_str())
            .bind(&content.year)
            .bind(&content.my_note)
            .bind(content.my_rating)
            .bind(&content.tags)
            .bind(content.created_at)
            .bind(content.updated_at)
            .fetch_one(&self.pool)
            .await?;

        tracing::debug!(content_id = %row.id, "Content inserted");
        Ok(row.into())
    }

    async fn update_content(&self, id: Uuid, input: NewContent) -> AppResult<Option<Content>> {
        let sql = format!(
            "UPDATE contents SET tmdb_id = $2, title = $3, name = $4, overview = $5, \
             release_date = $6, first_air_date = $7, poster_path = $8, poster_url = $9, \
             backdrop_path = $10, genre_ids = $11, popularity = $12, vote_average = $13, \
             vote_count = $14, adult = $15, media_type = $16, year = $17, my_note = $18, \
             my_rating = $19, tags = $20, updated_at = NOW() \
             WHERE id = $1 RETURNING {}",
            CONTENT_COLUMNS
        );

        let row: Option<ContentRow> = sqlx::query_as(&sql)
            .bind(id)
            .bind(&input.tmdb_id)
            .bind(&input.title)
            .bind(&input.name)
            .bind(&input.overview)
            .bind(&input.release_date)
            .bind(&input.first_air_date)
            .bind(&input.poster_path)
            .bind(&input.poster_url)
            .bind(&input.backdrop_path)
            .bind(&input.genre_ids)
            .bind(input.popularity)
            .bind(input.vote_average)
            .bind(input.vote_count)
            .bind(input.adult)
            .bind(input.media_type.as_str())
            .bind(&input.year)
            .bind(&input.my_note)
            .bind(input.my_rating)
            .bind(&input.tags)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Content::from))
    }

    async fn delete_content(&self, id: Uuid) -> AppResult<bool> {
        // comments.content_id cascades
        let result = sqlx::query("DELETE FROM contents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_comments(&self, content_id: Uuid) -> AppResult<Vec<Comment>> {
        let rows: Vec<CommentRow> = sqlx::query_as(
            "SELECT id, content_id, nickname, text, created_at FROM comments \
             WHERE content_id = $1 ORDER BY created_at ASC",
        )
        .bind(content_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Comment::from).collect())
    }

    async fn create_comment(&self, content_id: Uuid, input: NewComment) -> AppResult<Comment> {
        let comment = Comment::new(content_id, input);
        let row: CommentRow = sqlx::query_as(
            "INSERT INTO comments (id, content_id, nickname, text, created_at) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, content_id, nickname, text, created_at",
        )
        .bind(comment.id)
        .bind(comment.content_id)
        .bind(&comment.nickname)
        .bind(&comment.text)
        .bind(comment.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    fn name(&self) -> &'static str {
        "postgres"
    }
}
