use async_trait::async_trait;
use cashipe_catalog::repository::CatalogRepository;
use cashipe_catalog::DeviceCatalogEntry;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

pub struct PgCatalogRepository {
    pool: PgPool,
}

impl PgCatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal struct for type-safe querying
#[derive(sqlx::FromRow)]
struct DeviceRow {
    id: Uuid,
    category: String,
    brand: String,
    model: String,
    base_price: i64,
    storage_options: Value,
    conditions: Value,
    grade: Option<String>,
}

impl DeviceRow {
    fn into_entry(self) -> Result<DeviceCatalogEntry, Box<dyn std::error::Error + Send + Sync>> {
        let grade = match self.grade {
            Some(g) => Some(serde_json::from_value(Value::String(g))?),
            None => None,
        };
        Ok(DeviceCatalogEntry {
            id: self.id,
            category: self.category,
            brand: self.brand,
            model: self.model,
            base_price: self.base_price,
            storage_options: serde_json::from_value(self.storage_options)?,
            conditions: serde_json::from_value(self.conditions)?,
            grade,
        })
    }
}

#[async_trait]
impl CatalogRepository for PgCatalogRepository {
    async fn find_device(
        &self,
        category: &str,
        brand: &str,
        model: &str,
    ) -> Result<Option<DeviceCatalogEntry>, Box<dyn std::error::Error + Send + Sync>> {
        let row = sqlx::query_as::<_, DeviceRow>(
            "SELECT id, category, brand, model, base_price, storage_options, conditions, grade \
             FROM device_catalog WHERE category = $1 AND brand = $2 AND model = $3",
        )
        .bind(category)
        .bind(brand)
        .bind(model)
        .fetch_optional(&self.pool)
        .await?;

        row.map(DeviceRow::into_entry).transpose()
    }

    async fn list_devices(
        &self,
        category: Option<&str>,
    ) -> Result<Vec<DeviceCatalogEntry>, Box<dyn std::error::Error + Send + Sync>> {
        let rows = match category {
            Some(category) => {
                sqlx::query_as::<_, DeviceRow>(
                    "SELECT id, category, brand, model, base_price, storage_options, conditions, grade \
                     FROM device_catalog WHERE category = $1 ORDER BY brand, model",
                )
                .bind(category)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, DeviceRow>(
                    "SELECT id, category, brand, model, base_price, storage_options, conditions, grade \
                     FROM device_catalog ORDER BY category, brand, model",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.into_iter().map(DeviceRow::into_entry).collect()
    }
}
