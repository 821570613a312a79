use async_trait::async_trait;
use cashipe_promo::repository::{PromoRepository, PromoStoreError};
use cashipe_promo::Promo;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

pub struct PgPromoRepository {
    pool: PgPool,
}

impl PgPromoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal struct for type-safe querying
#[derive(sqlx::FromRow)]
struct PromoRow {
    id: Uuid,
    code: String,
    promo_type: String,
    amount: f64,
    active: bool,
    min_order_value: Option<i64>,
    expires_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

const PROMO_COLUMNS: &str =
    "id, code, promo_type, amount, active, min_order_value, expires_at, created_at";

impl PromoRow {
    fn into_promo(self) -> Result<Promo, PromoStoreError> {
        let promo_type = serde_json::from_value(Value::String(self.promo_type))
            .map_err(|e| PromoStoreError::Backend(e.to_string()))?;
        Ok(Promo {
            id: self.id,
            code: self.code,
            promo_type,
            amount: self.amount,
            active: self.active,
            min_order_value: self.min_order_value,
            expires_at: self.expires_at,
            created_at: self.created_at,
        })
    }
}

fn map_sqlx_error(code: &str, err: sqlx::Error) -> PromoStoreError {
    if let Some(db_err) = err.as_database_error() {
        // 23505: unique_violation on the code column
        if db_err.code().as_deref() == Some("23505") {
            return PromoStoreError::DuplicateCode(code.to_string());
        }
    }
    PromoStoreError::Backend(err.to_string())
}

fn promo_type_str(promo: &Promo) -> Result<String, PromoStoreError> {
    match serde_json::to_value(promo.promo_type) {
        Ok(Value::String(s)) => Ok(s),
        Ok(other) => Err(PromoStoreError::Backend(format!(
            "unexpected promo type encoding: {other}"
        ))),
        Err(e) => Err(PromoStoreError::Backend(e.to_string())),
    }
}

#[async_trait]
impl PromoRepository for PgPromoRepository {
    async fn find_active(&self, code: &str) -> Result<Option<Promo>, PromoStoreError> {
        let row = sqlx::query_as::<_, PromoRow>(&format!(
            "SELECT {PROMO_COLUMNS} FROM promos WHERE code = $1 AND active = TRUE"
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PromoStoreError::Backend(e.to_string()))?;

        row.map(PromoRow::into_promo).transpose()
    }

    async fn create(&self, promo: &Promo) -> Result<Promo, PromoStoreError> {
        sqlx::query(
            "INSERT INTO promos (id, code, promo_type, amount, active, min_order_value, \
             expires_at, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(promo.id)
        .bind(&promo.code)
        .bind(promo_type_str(promo)?)
        .bind(promo.amount)
        .bind(promo.active)
        .bind(promo.min_order_value)
        .bind(promo.expires_at)
        .bind(promo.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(&promo.code, e))?;

        Ok(promo.clone())
    }

    async fn list(&self) -> Result<Vec<Promo>, PromoStoreError> {
        let rows = sqlx::query_as::<_, PromoRow>(&format!(
            "SELECT {PROMO_COLUMNS} FROM promos ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PromoStoreError::Backend(e.to_string()))?;

        rows.into_iter().map(PromoRow::into_promo).collect()
    }

    async fn update(&self, id: Uuid, promo: &Promo) -> Result<Option<Promo>, PromoStoreError> {
        let result = sqlx::query(
            "UPDATE promos SET code = $1, promo_type = $2, amount = $3, active = $4, \
             min_order_value = $5, expires_at = $6 WHERE id = $7",
        )
        .bind(&promo.code)
        .bind(promo_type_str(promo)?)
        .bind(promo.amount)
        .bind(promo.active)
        .bind(promo.min_order_value)
        .bind(promo.expires_at)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(&promo.code, e))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        let mut updated = promo.clone();
        updated.id = id;
        Ok(Some(updated))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, PromoStoreError> {
        let result = sqlx::query("DELETE FROM promos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| PromoStoreError::Backend(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}
