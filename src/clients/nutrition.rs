use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::NutritionConfig;

#[derive(Debug, Error)]
pub enum NutritionError {
    #[error("nutrition request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("nutrition service returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("nutrition response missing nutrient {0}")]
    MissingNutrient(&'static str),
}

/// Complete nutrient breakdown for one recipe, as stored alongside it.
/// Either every field maps or the whole analysis fails; there is no
/// partial result.
#[derive(Debug, Clone, PartialEq)]
pub struct NutritionFacts {
    pub total_calories: f64,
    pub fat_g: f64,
    pub fat_pct: f64,
    pub saturated_fat_g: f64,
    pub saturated_fat_pct: f64,
    pub protein_g: f64,
    pub protein_pct: f64,
    pub carbs_g: f64,
    pub carbs_pct: f64,
    pub sugar_g: f64,
    pub salt_g: f64,
    pub salt_pct: f64,
}

/// Computes nutrition facts for a list of ingredient lines already
/// normalized to the language the service understands.
#[async_trait]
pub trait NutritionApi: Send + Sync {
    async fn analyze(&self, ingredients: &[String]) -> Result<NutritionFacts, NutritionError>;
}

#[derive(Debug, Serialize)]
struct AnalysisRequest<'a> {
    // title is sent blank on purpose: the service only needs the
    // ingredient lines to compute totals
    title: &'a str,
    ingr: &'a [String],
}

#[derive(Debug, Deserialize)]
struct Nutrient {
    quantity: f64,
}

#[derive(Debug, Deserialize)]
struct AnalysisResponse {
    #[serde(rename = "totalNutrients", default)]
    total_nutrients: HashMap<String, Nutrient>,
    #[serde(rename = "totalDaily", default)]
    total_daily: HashMap<String, Nutrient>,
}

impl AnalysisResponse {
    fn nutrient(&self, code: &'static str) -> Result<f64, NutritionError> {
        self.total_nutrients
            .get(code)
            .map(|n| n.quantity)
            .ok_or(NutritionError::MissingNutrient(code))
    }

    fn daily(&self, code: &'static str) -> Result<f64, NutritionError> {
        self.total_daily
            .get(code)
            .map(|n| n.quantity)
            .ok_or(NutritionError::MissingNutrient(code))
    }
}

fn facts_from_response(resp: &AnalysisResponse) -> Result<NutritionFacts, NutritionError> {
    Ok(NutritionFacts {
        total_calories: resp.nutrient("ENERC_KCAL")?,
        fat_g: resp.nutrient("FAT")?,
        fat_pct: resp.daily("FAT")?,
        saturated_fat_g: resp.nutrient("FASAT")?,
        saturated_fat_pct: resp.daily("FASAT")?,
        protein_g: resp.nutrient("PROCNT")?,
        protein_pct: resp.daily("PROCNT")?,
        carbs_g: resp.nutrient("CHOCDF")?,
        carbs_pct: resp.daily("CHOCDF")?,
        sugar_g: resp.nutrient("SUGAR")?,
        // the service reports sodium (NA); its raw quantity is stored
        // in the salt fields unchanged, no unit conversion
        salt_g: resp.nutrient("NA")?,
        salt_pct: resp.daily("NA")?,
    })
}

/// Edamam-compatible HTTP client for the nutrition analysis API.
#[derive(Clone)]
pub struct NutritionClient {
    http: reqwest::Client,
    config: NutritionConfig,
}

impl NutritionClient {
    pub fn new(config: NutritionConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl NutritionApi for NutritionClient {
    async fn analyze(&self, ingredients: &[String]) -> Result<NutritionFacts, NutritionError> {
        let body = AnalysisRequest {
            title: "",
            ingr: ingredients,
        };

        let resp = self
            .http
            .post(&self.config.url)
            .query(&[
                ("app_id", self.config.app_id.as_str()),
                ("app_key", self.config.app_key.as_str()),
            ])
            .json(&body)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(NutritionError::Status(resp.status()));
        }

        let parsed: AnalysisResponse = resp.json().await?;
        let facts = facts_from_response(&parsed)?;
        debug!(calories = facts.total_calories, "nutrition analyzed");
        Ok(facts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_response() -> AnalysisResponse {
        serde_json::from_str(
            r#"{
                "totalNutrients": {
                    "ENERC_KCAL": {"quantity": 250.0},
                    "FAT": {"quantity": 10.5},
                    "FASAT": {"quantity": 3.2},
                    "PROCNT": {"quantity": 12.0},
                    "CHOCDF": {"quantity": 30.0},
                    "SUGAR": {"quantity": 1.5},
                    "NA": {"quantity": 480.0}
                },
                "totalDaily": {
                    "FAT": {"quantity": 16.1},
                    "FASAT": {"quantity": 16.0},
                    "PROCNT": {"quantity": 24.0},
                    "CHOCDF": {"quantity": 10.0},
                    "NA": {"quantity": 20.0}
                }
            }"#,
        )
        .expect("fixture parses")
    }

    #[test]
    fn maps_all_nutrient_codes() {
        let facts = facts_from_response(&full_response()).expect("full mapping");
        assert_eq!(facts.total_calories, 250.0);
        assert_eq!(facts.fat_g, 10.5);
        assert_eq!(facts.fat_pct, 16.1);
        assert_eq!(facts.saturated_fat_g, 3.2);
        assert_eq!(facts.protein_pct, 24.0);
        assert_eq!(facts.carbs_g, 30.0);
        assert_eq!(facts.sugar_g, 1.5);
    }

    #[test]
    fn sodium_quantity_is_stored_as_salt_unchanged() {
        let facts = facts_from_response(&full_response()).expect("full mapping");
        // raw NA quantity lands in salt_g without any conversion
        assert_eq!(facts.salt_g, 480.0);
        assert_eq!(facts.salt_pct, 20.0);
    }

    #[test]
    fn missing_nutrient_fails_the_whole_mapping() {
        let mut resp = full_response();
        resp.total_nutrients.remove("PROCNT");
        let err = facts_from_response(&resp).unwrap_err();
        match err {
            NutritionError::MissingNutrient(code) => assert_eq!(code, "PROCNT"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_daily_value_fails_the_whole_mapping() {
        let mut resp = full_response();
        resp.total_daily.remove("NA");
        assert!(facts_from_response(&resp).is_err());
    }

    #[test]
    fn request_payload_sends_blank_title() {
        let ingredients = vec!["egg".to_string(), "rice".to_string()];
        let body = AnalysisRequest {
            title: "",
            ingr: &ingredients,
        };
        let json = serde_json::to_value(&body).expect("serialize");
        assert_eq!(json["title"], "");
        assert_eq!(json["ingr"][1], "rice");
    }
}
