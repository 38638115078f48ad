use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::recipes::repo::{Nutrition, Recipe, RecipeCategory};

#[derive(Debug, Deserialize)]
pub struct CreateRecipeRequest {
    pub title: String,
    pub image: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub total_time_minutes: i32,
    pub ingredients: Vec<String>,
    pub video: Option<String>,
    #[serde(default)]
    pub step_descriptions: Vec<String>,
    #[serde(default)]
    pub step_images: Vec<String>,
    pub category: RecipeCategory,
}

/// Partial update: a present, non-empty value overwrites; anything
/// absent or empty leaves the stored value alone. An empty string is
/// indistinguishable from "not provided" and cannot clear a field.
#[derive(Debug, Default, Deserialize)]
pub struct EditRecipeRequest {
    pub title: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub total_time_minutes: Option<i32>,
    pub ingredients: Option<Vec<String>>,
    pub video: Option<String>,
    pub step_descriptions: Option<Vec<String>>,
    pub step_images: Option<Vec<String>>,
    pub category: Option<RecipeCategory>,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    /// Comma-separated category names.
    pub category: Option<String>,
    pub search: Option<String>,
    /// Comma-separated ingredients; all must be present to match.
    pub ingredients: Option<String>,
    /// "true" switches the sort to like count descending.
    pub popular: Option<String>,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}
fn default_limit() -> i64 {
    20
}

/// Reduced projection used by listings.
#[derive(Debug, Serialize)]
pub struct RecipeListItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub image: Option<String>,
    pub total_time_minutes: i32,
    pub likes: i64,
    pub category: RecipeCategory,
    pub created_at: OffsetDateTime,
}

impl From<Recipe> for RecipeListItem {
    fn from(r: Recipe) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            title: r.title,
            image: r.image,
            total_time_minutes: r.total_time_minutes,
            likes: r.likes,
            category: r.category,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecipeListResponse {
    pub items: Vec<RecipeListItem>,
    pub total_pages: i64,
    pub page: i64,
    pub limit: i64,
}

#[derive(Debug, Serialize)]
pub struct RecipeDetails {
    pub recipe: Recipe,
    pub nutrition: Option<Nutrition>,
    /// Whether the current caller has liked this recipe; false for
    /// anonymous callers.
    pub liked: bool,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
