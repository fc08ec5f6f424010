//! Seeded in-memory fact store shared by the async tests.

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::db::reader::apply_schema;

const SEED_SQL: &[&str] = &[
    "INSERT INTO Airline (company_id, company_name) VALUES (1, 'Spirit'), (2, 'JetBlue'), (3, 'Hawaiian')",
    r#"INSERT INTO IncomeStatement VALUES
        (1, 2022, '5,068', '4,900', '168', '5,600', '300', '250', '5,050', '0', '532'),
        (1, 2023, '5,362', '5,200', '162', '5,800', '310', '280', '5,210', '0', 'n/a'),
        (2, 2022, '9,158', '8,900', '258', '9,400', '420', '510', '8,470', '0', '242'),
        (2, 2023, '1,000', '900', '100', '850', '300', '200', '350', '150', '0')"#,
    r#"INSERT INTO Multiple VALUES
        (1, '2023-03-31', 'revenue', 0.30, 0.35, 0.2, 0.5),
        (1, '2023-06-30', 'revenue', 0.32, 0.35, 0.2, 0.5),
        (2, '2022-03-31', 'revenue', 0.50, 0.45, 0.3, 0.6),
        (2, '2022-06-30', 'revenue', 0.60, 0.45, 0.3, 0.6),
        (2, '2023-06-30', 'revenue', 0.55, 0.556, 0.4, 0.7),
        (2, '2023-03-31', 'revenue', 0.50, 0.556, 0.4, 0.7),
        (2, '2023-03-31', 'ebitda', 5.0, 6.0, 4.0, 8.0)"#,
    r#"INSERT INTO KeyRatios VALUES
        (1, 2023, '0.05', '1.2', '0.6', '2.1', '0.08'),
        (2, 2023, '0.07', '0.9', '0.5', '1.8', '0.11'),
        (3, 2022, '0.02', 'abc', '0.7', '2.5', '0.03')"#,
    r#"INSERT INTO key_financial VALUES
        (1, 2023, 5362.0),
        (2, 2022, 9158.0),
        (2, 2023, 1000.0),
        (3, 2023, 2700.0)"#,
];

/// A single-connection in-memory pool; every connection of an in-memory
/// SQLite pool would otherwise see its own empty database.
pub async fn empty_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    apply_schema(&pool).await.expect("schema");
    pool
}

pub async fn seeded_pool() -> SqlitePool {
    let pool = empty_pool().await;
    for statement in SEED_SQL {
        sqlx::query(statement)
            .execute(&pool)
            .await
            .expect("seed statement");
    }
    pool
}
