// src/database.rs
use crate::scoring::ScoringInput;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

const MEMORY_PATH: &str = ":memory:";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Gig {
    pub id: String,
    pub title: String,
    pub description: String,
    pub skills: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Application {
    pub id: String,
    pub gig_id: Option<String>,
    pub candidate_name: String,
    pub resume_text: String,
    pub skills: Vec<String>,
    pub experience_years: f64,
    pub portfolio_links: Vec<String>,
    pub ai_score: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Application {
    pub fn scoring_input(&self, job_description: Option<String>) -> ScoringInput {
        ScoringInput {
            resume_text: self.resume_text.clone(),
            skills: self.skills.clone(),
            experience_years: self.experience_years,
            portfolio_links: self.portfolio_links.clone(),
            job_description,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewGig {
    pub title: String,
    pub description: String,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NewApplication {
    pub gig_id: Option<String>,
    pub candidate_name: String,
    pub resume_text: String,
    pub skills: Vec<String>,
    pub experience_years: f64,
    pub portfolio_links: Vec<String>,
}

// List columns are stored as JSON text.
#[derive(sqlx::FromRow)]
struct GigRow {
    id: String,
    title: String,
    description: String,
    skills: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<GigRow> for Gig {
    type Error = anyhow::Error;

    fn try_from(row: GigRow) -> Result<Self> {
        Ok(Self {
            skills: decode_list(&row.skills)?,
            id: row.id,
            title: row.title,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ApplicationRow {
    id: String,
    gig_id: Option<String>,
    candidate_name: String,
    resume_text: String,
    skills: String,
    experience_years: f64,
    portfolio_links: String,
    ai_score: Option<i64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ApplicationRow> for Application {
    type Error = anyhow::Error;

    fn try_from(row: ApplicationRow) -> Result<Self> {
        Ok(Self {
            skills: decode_list(&row.skills)?,
            portfolio_links: decode_list(&row.portfolio_links)?,
            id: row.id,
            gig_id: row.gig_id,
            candidate_name: row.candidate_name,
            resume_text: row.resume_text,
            experience_years: row.experience_years,
            ai_score: row.ai_score,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn encode_list(items: &[String]) -> Result<String> {
    serde_json::to_string(items).context("Failed to encode list column")
}

fn decode_list(raw: &str) -> Result<Vec<String>> {
    serde_json::from_str(raw).with_context(|| format!("Corrupt list column: {}", raw))
}

#[derive(Debug)]
pub struct DatabaseConfig {
    pub database_path: PathBuf,
    pub pool: Option<SqlitePool>,
}

impl DatabaseConfig {
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            database_path,
            pool: None,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(PathBuf::from(MEMORY_PATH))
    }

    fn is_memory(&self) -> bool {
        self.database_path == Path::new(MEMORY_PATH)
    }

    /// Initialize the database connection pool
    pub async fn init_pool(&mut self) -> Result<()> {
        let mut options = SqlitePoolOptions::new();
        let database_url = if self.is_memory() {
            // Each in-memory connection is its own database; keep exactly one alive.
            options = options
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
            "sqlite::memory:".to_string()
        } else {
            if let Some(parent) = self.database_path.parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent)
                        .await
                        .context("Failed to create database directory")?;
                }
            }
            options = options.max_connections(5);
            format!("sqlite:{}?mode=rwc", self.database_path.display())
        };

        let pool = options
            .connect(&database_url)
            .await
            .context("Failed to connect to SQLite database")?;
        self.pool = Some(pool);

        info!("Database connection pool initialized: {}", database_url);
        Ok(())
    }

    /// Get the database pool
    pub fn pool(&self) -> Result<&SqlitePool> {
        self.pool.as_ref().ok_or_else(|| {
            anyhow::anyhow!("Database pool not initialized. Call init_pool() first.")
        })
    }

    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
            info!("Database connection pool closed");
        }
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        let pool = self.pool()?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS gigs (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                skills TEXT NOT NULL DEFAULT '[]',
                created_at TEXT NOT NULL DEFAULT (datetime('now')),
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS applications (
                id TEXT PRIMARY KEY,
                gig_id TEXT REFERENCES gigs(id),
                candidate_name TEXT NOT NULL,
                resume_text TEXT NOT NULL DEFAULT '',
                skills TEXT NOT NULL DEFAULT '[]',
                experience_years REAL NOT NULL DEFAULT 0,
                portfolio_links TEXT NOT NULL DEFAULT '[]',
                ai_score INTEGER,
                created_at TEXT NOT NULL DEFAULT (datetime('now')),
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_applications_gig_id
            ON applications(gig_id);
            "#,
        )
        .execute(pool)
        .await?;

        info!("Database migrations completed successfully");
        Ok(())
    }
}

pub struct GigRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> GigRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new_gig: &NewGig) -> Result<Gig> {
        let now = Utc::now();
        let id = Uuid::new_v4().to_string();

        sqlx::query(
            r#"
            INSERT INTO gigs (id, title, description, skills, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&new_gig.title)
        .bind(&new_gig.description)
        .bind(encode_list(&new_gig.skills)?)
        .bind(now)
        .bind(now)
        .execute(self.pool)
        .await?;

        info!("Created gig: {} ({})", new_gig.title, id);

        Ok(Gig {
            id,
            title: new_gig.title.clone(),
            description: new_gig.description.clone(),
            skills: new_gig.skills.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Gig>> {
        let row = sqlx::query_as::<_, GigRow>(
            r#"
            SELECT id, title, description, skills, created_at, updated_at
            FROM gigs
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Gig::try_from).transpose()
    }

    pub async fn list(&self) -> Result<Vec<Gig>> {
        let rows = sqlx::query_as::<_, GigRow>(
            r#"
            SELECT id, title, description, skills, created_at, updated_at
            FROM gigs
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Gig::try_from).collect()
    }
}

pub struct ApplicationRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ApplicationRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new_application: &NewApplication) -> Result<Application> {
        let now = Utc::now();
        let id = Uuid::new_v4().to_string();

        sqlx::query(
            r#"
            INSERT INTO applications (
                id, gig_id, candidate_name, resume_text, skills,
                experience_years, portfolio_links, ai_score, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, NULL, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&new_application.gig_id)
        .bind(&new_application.candidate_name)
        .bind(&new_application.resume_text)
        .bind(encode_list(&new_application.skills)?)
        .bind(new_application.experience_years)
        .bind(encode_list(&new_application.portfolio_links)?)
        .bind(now)
        .bind(now)
        .execute(self.pool)
        .await?;

        info!(
            "Created application {} for candidate: {}",
            id, new_application.candidate_name
        );

        Ok(Application {
            id,
            gig_id: new_application.gig_id.clone(),
            candidate_name: new_application.candidate_name.clone(),
            resume_text: new_application.resume_text.clone(),
            skills: new_application.skills.clone(),
            experience_years: new_application.experience_years,
            portfolio_links: new_application.portfolio_links.clone(),
            ai_score: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Application>> {
        let row = sqlx::query_as::<_, ApplicationRow>(
            r#"
            SELECT id, gig_id, candidate_name, resume_text, skills,
                   experience_years, portfolio_links, ai_score, created_at, updated_at
            FROM applications
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Application::try_from).transpose()
    }

    pub async fn list(&self) -> Result<Vec<Application>> {
        let rows = sqlx::query_as::<_, ApplicationRow>(
            r#"
            SELECT id, gig_id, candidate_name, resume_text, skills,
                   experience_years, portfolio_links, ai_score, created_at, updated_at
            FROM applications
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Application::try_from).collect()
    }

    /// Store the overall score. Returns whether a row was updated.
    pub async fn update_score(&self, id: &str, score: u8) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE applications
            SET ai_score = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(i64::from(score))
        .bind(Utc::now())
        .bind(id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_db() -> DatabaseConfig {
        let mut db = DatabaseConfig::in_memory();
        db.init_pool().await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    fn sample_application(gig_id: Option<String>) -> NewApplication {
        NewApplication {
            gig_id,
            candidate_name: "Ada".to_string(),
            resume_text: "Compilers and marketplaces".to_string(),
            skills: vec!["rust".to_string(), "sql".to_string()],
            experience_years: 2.5,
            portfolio_links: vec!["https://github.com/ada".to_string()],
        }
    }

    #[tokio::test]
    async fn test_pool_required_before_use() {
        let db = DatabaseConfig::in_memory();
        assert!(db.pool().is_err());
        assert!(db.migrate().await.is_err());
    }

    #[tokio::test]
    async fn test_migrate_is_idempotent() {
        let db = memory_db().await;
        db.migrate().await.unwrap();
    }

    #[tokio::test]
    async fn test_gig_create_and_find() {
        let db = memory_db().await;
        let repo = GigRepository::new(db.pool().unwrap());

        let gig = repo
            .create(&NewGig {
                title: "Landing page".to_string(),
                description: "Build a landing page in React".to_string(),
                skills: vec!["react".to_string()],
            })
            .await
            .unwrap();

        let found = repo.find_by_id(&gig.id).await.unwrap().unwrap();
        assert_eq!(found.title, "Landing page");
        assert_eq!(found.skills, vec!["react".to_string()]);
        assert!(repo.find_by_id("missing").await.unwrap().is_none());
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_application_round_trip_and_score_update() {
        let db = memory_db().await;
        let pool = db.pool().unwrap();
        let repo = ApplicationRepository::new(pool);

        let created = repo.create(&sample_application(None)).await.unwrap();
        let found = repo.find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(found.skills, created.skills);
        assert_eq!(found.portfolio_links, created.portfolio_links);
        assert_eq!(found.experience_years, 2.5);
        assert_eq!(found.ai_score, None);

        assert!(repo.update_score(&created.id, 42).await.unwrap());
        let updated = repo.find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(updated.ai_score, Some(42));

        assert!(!repo.update_score("missing", 10).await.unwrap());
    }

    #[tokio::test]
    async fn test_application_to_scoring_input() {
        let db = memory_db().await;
        let repo = ApplicationRepository::new(db.pool().unwrap());
        let application = repo.create(&sample_application(None)).await.unwrap();

        let input = application.scoring_input(Some("Rust backend".to_string()));
        assert_eq!(input.skills.len(), 2);
        assert_eq!(input.experience_years, 2.5);
        assert_eq!(input.resume_text, "Compilers and marketplaces");
        assert_eq!(input.job_description.as_deref(), Some("Rust backend"));
    }

    #[tokio::test]
    async fn test_close_pool() {
        let db = memory_db().await;
        db.close().await;
        assert!(db.pool().unwrap().is_closed());
    }
}
