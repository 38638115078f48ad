use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

/// External translation service used to normalize ingredient text
/// before nutrition analysis.
#[derive(Debug, Clone, Deserialize)]
pub struct TranslateConfig {
    pub url: String,
    pub source_lang: String,
    pub target_lang: String,
}

/// External nutrition analysis service (Edamam-compatible API).
#[derive(Debug, Clone, Deserialize)]
pub struct NutritionConfig {
    pub url: String,
    pub app_id: String,
    pub app_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub translate: TranslateConfig,
    pub nutrition: NutritionConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "forkful".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "forkful-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
            refresh_ttl_minutes: std::env::var("JWT_REFRESH_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24 * 14),
        };
        let translate = TranslateConfig {
            url: std::env::var("TRANSLATE_URL")?,
            source_lang: std::env::var("TRANSLATE_SOURCE_LANG").unwrap_or_else(|_| "id".into()),
            target_lang: std::env::var("TRANSLATE_TARGET_LANG").unwrap_or_else(|_| "en".into()),
        };
        let nutrition = NutritionConfig {
            url: std::env::var("NUTRITION_URL")?,
            app_id: std::env::var("NUTRITION_APP_ID")?,
            app_key: std::env::var("NUTRITION_APP_KEY")?,
        };
        Ok(Self {
            database_url,
            jwt,
            translate,
            nutrition,
        })
    }
}
