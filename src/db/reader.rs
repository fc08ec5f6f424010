use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;

use crate::db::models::{
    IncomeStatementRow, KeyRatioRow, MultipleRow, RawFacts, ValuationBoundRow,
};
use crate::error::Result;

const INCOME_STATEMENTS_SQL: &str = r#"
    SELECT
        a.company_name                                  AS company,
        CAST(i.year AS INTEGER)                         AS year,
        CAST(i.revenue AS TEXT)                         AS revenue,
        CAST(i.sales_and_services_revenue AS TEXT)      AS sales_and_services_revenue,
        CAST(i.other_revenue AS TEXT)                   AS other_revenue,
        CAST(i.operating_expenses AS TEXT)              AS operating_expenses,
        CAST(i.selling_and_marketing AS TEXT)           AS selling_and_marketing,
        CAST(i.depreciation_and_amortization AS TEXT)   AS depreciation_and_amortization,
        CAST(i.other_operating_expense AS TEXT)         AS other_operating_expense,
        CAST(i.operating_income AS TEXT)                AS operating_income,
        CAST(i.operating_loss AS TEXT)                  AS operating_loss
    FROM Airline a
    JOIN IncomeStatement i ON a.company_id = i.company_id
    ORDER BY a.company_id, i.year
"#;

const MULTIPLES_SQL: &str = r#"
    SELECT
        a.company_name                      AS company,
        CAST(m.date AS TEXT)                AS date,
        m.multiple_type                     AS multiple_type,
        CAST(m.multiple_value AS REAL)      AS multiple_value,
        CAST(m.average AS REAL)             AS average,
        CAST(m.Q1 AS REAL)                  AS q1,
        CAST(m.Q3 AS REAL)                  AS q3
    FROM Multiple m
    JOIN Airline a ON a.company_id = m.company_id
    ORDER BY a.company_id, m.date, m.multiple_type
"#;

const KEY_RATIOS_SQL: &str = r#"
    SELECT
        a.company_name                              AS company,
        CAST(k.ratio_year AS INTEGER)               AS ratio_year,
        CAST(k.return_on_assets AS TEXT)            AS profitability,
        CAST(k.quick_ratio AS TEXT)                 AS liquidity,
        CAST(k.total_debt_to_capital AS TEXT)       AS credit,
        CAST(k.total_debt_to_equity AS TEXT)        AS leverage_ratio,
        CAST(k.return_on_invested_capit AS TEXT)    AS roic
    FROM Airline a
    JOIN KeyRatios k ON a.company_id = k.company_id
    ORDER BY a.company_id, k.ratio_year
"#;

/// Bounds are the Q1/Q3 bands of the calendar year matching the fiscal year.
const VALUATION_BOUNDS_SQL: &str = r#"
    SELECT DISTINCT
        a.company_name                  AS company,
        CAST(f.fin_year AS INTEGER)     AS fin_year,
        m.multiple_type                 AS multiple_type,
        CAST(f.revenue AS REAL)         AS revenue,
        CAST(m.Q1 AS REAL)              AS lower,
        CAST(m.Q3 AS REAL)              AS upper
    FROM key_financial f
    JOIN Multiple m
        ON m.company_id = f.company_id
       AND CAST(strftime('%Y', m.date) AS INTEGER) = CAST(f.fin_year AS INTEGER)
    JOIN Airline a ON a.company_id = f.company_id
    ORDER BY a.company_id, f.fin_year, m.multiple_type
"#;

/// Opens the fact store. The store is read-only unless `init_schema` asks for
/// the bundled schema to be applied first.
pub async fn connect(db_path: &str, init_schema: bool) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&format!("sqlite:{db_path}"))?
        .read_only(!init_schema)
        .create_if_missing(init_schema);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    if init_schema {
        apply_schema(&pool).await?;
        info!("Fact store schema applied at {db_path}");
    }
    Ok(pool)
}

pub async fn apply_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Read side of the fact store. Each query is issued once at startup and
/// returns its full result set.
pub struct FactStoreReader {
    pool: SqlitePool,
}

impl FactStoreReader {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn load_all(&self) -> Result<RawFacts> {
        let raw = RawFacts {
            income_statements: self.income_statements().await?,
            multiples: self.multiples().await?,
            key_ratios: self.key_ratios().await?,
            valuation_bounds: self.valuation_bounds().await?,
        };
        info!(
            income_statements = raw.income_statements.len(),
            multiples = raw.multiples.len(),
            key_ratios = raw.key_ratios.len(),
            valuation_bounds = raw.valuation_bounds.len(),
            "Fact store read complete"
        );
        Ok(raw)
    }

    pub async fn income_statements(&self) -> Result<Vec<IncomeStatementRow>> {
        Ok(sqlx::query_as::<_, IncomeStatementRow>(INCOME_STATEMENTS_SQL)
            .fetch_all(&self.pool)
            .await?)
    }

    pub async fn multiples(&self) -> Result<Vec<MultipleRow>> {
        Ok(sqlx::query_as::<_, MultipleRow>(MULTIPLES_SQL)
            .fetch_all(&self.pool)
            .await?)
    }

    pub async fn key_ratios(&self) -> Result<Vec<KeyRatioRow>> {
        Ok(sqlx::query_as::<_, KeyRatioRow>(KEY_RATIOS_SQL)
            .fetch_all(&self.pool)
            .await?)
    }

    pub async fn valuation_bounds(&self) -> Result<Vec<ValuationBoundRow>> {
        Ok(sqlx::query_as::<_, ValuationBoundRow>(VALUATION_BOUNDS_SQL)
            .fetch_all(&self.pool)
            .await?)
    }
}
