use async_trait::async_trait;
use cashipe_catalog::repository::QuoteRepository;
use cashipe_catalog::Quote;
use sqlx::PgPool;
use uuid::Uuid;

pub struct PgQuoteRepository {
    pool: PgPool,
}

impl PgQuoteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuoteRepository for PgQuoteRepository {
    async fn save_quote(
        &self,
        quote: &Quote,
    ) -> Result<Uuid, Box<dyn std::error::Error + Send + Sync>> {
        let questionnaire = quote
            .questionnaire
            .as_ref()
            .map(serde_json::to_value)
            .transpose()?;

        sqlx::query(
            "INSERT INTO quotes (id, user_id, category, brand, model, storage, condition, \
             questionnaire, base_price, final_price, promo_code, promo_discount, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
        )
        .bind(quote.id)
        .bind(&quote.user_id)
        .bind(&quote.category)
        .bind(&quote.brand)
        .bind(&quote.model)
        .bind(&quote.storage)
        .bind(&quote.condition)
        .bind(questionnaire)
        .bind(quote.base_price)
        .bind(quote.final_price)
        .bind(&quote.promo_code)
        .bind(quote.promo_discount)
        .bind(quote.created_at)
        .execute(&self.pool)
        .await?;

        Ok(quote.id)
    }
}
