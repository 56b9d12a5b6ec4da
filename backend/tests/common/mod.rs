#![allow(dead_code)]
use std::net::SocketAddr;

use sqlx::{postgres::PgPoolOptions, Connection, Executor, PgConnection, PgPool};
use uuid::Uuid;

use catalog_backend::{api, models::category::Category, AppState};

pub const GENRE_NAMES: &[&str] = &[
    "Action",
    "Horror",
    "Horror - Robots",
    "Horror - Based on Real Facts",
    "Drama",
    "Sci-fi IA",
    "Sci-fi Space",
    "Sci-fi Robots",
    "Sci-fi Future",
];

/// Build a valid category with a random name and description.
pub fn example_category() -> Category {
    let suffix = &Uuid::new_v4().simple().to_string()[..8];
    Category::new(
        format!("Category {}", suffix),
        format!("Description for category {}", suffix),
        true,
    )
    .expect("example category should be valid")
}

pub fn example_categories(length: usize) -> Vec<Category> {
    (0..length).map(|_| example_category()).collect()
}

pub fn categories_named(names: &[&str]) -> Vec<Category> {
    names
        .iter()
        .map(|name| {
            Category::new(*name, format!("About {}", name), true)
                .expect("named category should be valid")
        })
        .collect()
}

/// A migrated, throwaway Postgres schema. Every test gets its own, so row
/// counts from one test never leak into another.
pub struct TestDb {
    pub pool: PgPool,
    url: String,
    schema: String,
}

/// Connect to `TEST_DATABASE_URL` and migrate a fresh schema. Database
/// tests are `#[ignore]`d by default; run them with `cargo test -- --ignored`.
pub async fn test_db() -> TestDb {
    let url = std::env::var("TEST_DATABASE_URL")
        .expect("TEST_DATABASE_URL must be set — tests write/delete data and should not run against a shared database");

    let schema = format!("test_{}", Uuid::new_v4().simple());

    let mut conn = PgConnection::connect(&url)
        .await
        .expect("Failed to connect to test database");
    conn.execute(format!("CREATE SCHEMA {}", schema).as_str())
        .await
        .expect("Failed to create test schema");
    let _ = conn.close().await;

    let search_path = format!("SET search_path TO {}", schema);
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .after_connect(move |conn, _meta| {
            let search_path = search_path.clone();
            Box::pin(async move {
                conn.execute(search_path.as_str()).await?;
                Ok(())
            })
        })
        .connect(&url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    TestDb { pool, url, schema }
}

impl TestDb {
    pub async fn cleanup(self) {
        self.pool.close().await;
        if let Ok(mut conn) = PgConnection::connect(&self.url).await {
            let _ = conn
                .execute(format!("DROP SCHEMA IF EXISTS {} CASCADE", self.schema).as_str())
                .await;
        }
    }
}

/// Spin up the real router on a random port against the given pool.
pub async fn spawn_app(pool: PgPool) -> SocketAddr {
    let app = api::router(AppState { pool });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr
}

pub fn http_client() -> reqwest::Client {
    reqwest::Client::new()
}
