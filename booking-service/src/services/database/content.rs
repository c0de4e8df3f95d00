use serde_json::Value;

use super::Database;
use crate::models::{PageContent, SettingValueType, SiteSetting};
use crate::services::ServiceError;

impl Database {
    // ==================== Site settings ====================

    pub async fn list_settings(&self) -> Result<Vec<SiteSetting>, ServiceError> {
        let settings =
            sqlx::query_as::<_, SiteSetting>("SELECT * FROM site_settings ORDER BY setting_key")
                .fetch_all(&self.pool)
                .await?;
        Ok(settings)
    }

    pub async fn find_setting(&self, key: &str) -> Result<Option<SiteSetting>, ServiceError> {
        let setting =
            sqlx::query_as::<_, SiteSetting>("SELECT * FROM site_settings WHERE setting_key = $1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;
        Ok(setting)
    }

    pub async fn upsert_setting(
        &self,
        key: &str,
        value: &str,
        value_type: SettingValueType,
        description: Option<&str>,
    ) -> Result<SiteSetting, ServiceError> {
        let setting = sqlx::query_as::<_, SiteSetting>(
            r#"
            INSERT INTO site_settings (setting_key, setting_value, value_type, description)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (setting_key) DO UPDATE SET
                setting_value = EXCLUDED.setting_value,
                value_type = EXCLUDED.value_type,
                description = COALESCE(EXCLUDED.description, site_settings.description),
                updated_utc = NOW()
            RETURNING *
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(value_type.as_str())
        .bind(description)
        .fetch_one(&self.pool)
        .await?;
        Ok(setting)
    }

    // ==================== Pages ====================

    pub async fn find_page(&self, slug: &str) -> Result<Option<PageContent>, ServiceError> {
        let page =
            sqlx::query_as::<_, PageContent>("SELECT * FROM page_contents WHERE page_slug = $1")
                .bind(slug)
                .fetch_optional(&self.pool)
                .await?;
        Ok(page)
    }

    pub async fn upsert_page(
        &self,
        slug: &str,
        title: &str,
        content: &Value,
        translations: &Value,
    ) -> Result<PageContent, ServiceError> {
        let page = sqlx::query_as::<_, PageContent>(
            r#"
            INSERT INTO page_contents (page_slug, title, content, translations)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (page_slug) DO UPDATE SET
                title = EXCLUDED.title,
                content = EXCLUDED.content,
                translations = EXCLUDED.translations,
                updated_utc = NOW()
            RETURNING *
            "#,
        )
        .bind(slug)
        .bind(title)
        .bind(content)
        .bind(translations)
        .fetch_one(&self.pool)
        .await?;
        Ok(page)
    }
}
