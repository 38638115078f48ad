use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::clients::nutrition::NutritionFacts;
use crate::recipes::dto::CreateRecipeRequest;
use crate::recipes::query::{RecipeFilter, SortOrder};

/// Closed set of recipe categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "recipe_category", rename_all = "lowercase")]
pub enum RecipeCategory {
    Breakfast,
    Lunch,
    Dinner,
    Dessert,
    Snack,
    Drink,
}

/// Recipe record. Steps are kept as two parallel arrays so the edit
/// contract (replace only when both sides arrive with equal length)
/// can operate on them directly.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Recipe {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub image: Option<String>,
    pub description: Option<String>,
    pub total_time_minutes: i32,
    pub ingredients: Vec<String>,
    pub video: Option<String>,
    pub step_descriptions: Vec<String>,
    pub step_images: Vec<String>,
    pub category: RecipeCategory,
    pub likes: i64,
    pub created_at: OffsetDateTime,
}

/// Derived nutrition record, 1:1 with its recipe. Always written
/// wholesale from a [`NutritionFacts`], never field by field.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Nutrition {
    pub id: Uuid,
    pub recipe_id: Uuid,
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
    pub created_at: OffsetDateTime,
}

const RECIPE_COLUMNS: &str = "id, user_id, title, image, description, total_time_minutes, \
     ingredients, video, step_descriptions, step_images, category, likes, created_at";

pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Recipe>> {
    let recipe = sqlx::query_as::<_, Recipe>(&format!(
        "SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(recipe)
}

pub async fn exists(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
    let found: Option<i32> = sqlx::query_scalar("SELECT 1 FROM recipes WHERE id = $1")
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(found.is_some())
}

pub async fn find_nutrition(db: &PgPool, recipe_id: Uuid) -> anyhow::Result<Option<Nutrition>> {
    let nutrition = sqlx::query_as::<_, Nutrition>(
        r#"
        SELECT id, recipe_id, total_calories, fat_g, fat_pct, saturated_fat_g,
               saturated_fat_pct, protein_g, protein_pct, carbs_g, carbs_pct,
               sugar_g, salt_g, salt_pct, created_at
        FROM nutrition
        WHERE recipe_id = $1
        "#,
    )
    .bind(recipe_id)
    .fetch_optional(db)
    .await?;
    Ok(nutrition)
}

fn upsert_nutrition(
    recipe_id: Uuid,
    facts: &NutritionFacts,
) -> sqlx::query::Query<'static, Postgres, sqlx::postgres::PgArguments> {
    sqlx::query(
        r#"
        INSERT INTO nutrition (recipe_id, total_calories, fat_g, fat_pct,
            saturated_fat_g, saturated_fat_pct, protein_g, protein_pct,
            carbs_g, carbs_pct, sugar_g, salt_g, salt_pct)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        ON CONFLICT (recipe_id) DO UPDATE SET
            total_calories = EXCLUDED.total_calories,
            fat_g = EXCLUDED.fat_g,
            fat_pct = EXCLUDED.fat_pct,
            saturated_fat_g = EXCLUDED.saturated_fat_g,
            saturated_fat_pct = EXCLUDED.saturated_fat_pct,
            protein_g = EXCLUDED.protein_g,
            protein_pct = EXCLUDED.protein_pct,
            carbs_g = EXCLUDED.carbs_g,
            carbs_pct = EXCLUDED.carbs_pct,
            sugar_g = EXCLUDED.sugar_g,
            salt_g = EXCLUDED.salt_g,
            salt_pct = EXCLUDED.salt_pct
        "#,
    )
    .bind(recipe_id)
    .bind(facts.total_calories)
    .bind(facts.fat_g)
    .bind(facts.fat_pct)
    .bind(facts.saturated_fat_g)
    .bind(facts.saturated_fat_pct)
    .bind(facts.protein_g)
    .bind(facts.protein_pct)
    .bind(facts.carbs_g)
    .bind(facts.carbs_pct)
    .bind(facts.sugar_g)
    .bind(facts.salt_g)
    .bind(facts.salt_pct)
}

/// Inserts the recipe and its nutrition record in one transaction so
/// a half-written aggregate can never be observed.
pub async fn insert_with_nutrition(
    db: &PgPool,
    user_id: Uuid,
    req: &CreateRecipeRequest,
    facts: &NutritionFacts,
) -> anyhow::Result<Recipe> {
    let mut tx = db.begin().await?;

    let recipe = sqlx::query_as::<_, Recipe>(&format!(
        r#"
        INSERT INTO recipes (user_id, title, image, description, total_time_minutes,
            ingredients, video, step_descriptions, step_images, category)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING {RECIPE_COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(&req.title)
    .bind(&req.image)
    .bind(&req.description)
    .bind(req.total_time_minutes)
    .bind(&req.ingredients)
    .bind(&req.video)
    .bind(&req.step_descriptions)
    .bind(&req.step_images)
    .bind(req.category)
    .fetch_one(&mut *tx)
    .await?;

    upsert_nutrition(recipe.id, facts).execute(&mut *tx).await?;
    tx.commit().await?;
    Ok(recipe)
}

/// Writes back an edited recipe and, when the ingredients were
/// re-analyzed, its recomputed nutrition, committed together.
pub async fn update_with_nutrition(
    db: &PgPool,
    recipe: &Recipe,
    facts: Option<&NutritionFacts>,
) -> anyhow::Result<()> {
    let mut tx = db.begin().await?;

    sqlx::query(
        r#"
        UPDATE recipes SET title = $2, image = $3, description = $4,
            total_time_minutes = $5, ingredients = $6, video = $7,
            step_descriptions = $8, step_images = $9, category = $10
        WHERE id = $1
        "#,
    )
    .bind(recipe.id)
    .bind(&recipe.title)
    .bind(&recipe.image)
    .bind(&recipe.description)
    .bind(recipe.total_time_minutes)
    .bind(&recipe.ingredients)
    .bind(&recipe.video)
    .bind(&recipe.step_descriptions)
    .bind(&recipe.step_images)
    .bind(recipe.category)
    .execute(&mut *tx)
    .await?;

    if let Some(facts) = facts {
        upsert_nutrition(recipe.id, facts).execute(&mut *tx).await?;
    }

    tx.commit().await?;
    Ok(())
}

/// Removes the recipe; nutrition, likes and bookmarks go with it via
/// the `ON DELETE CASCADE` foreign keys.
pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM recipes WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(())
}

fn push_filters<'a>(qb: &mut QueryBuilder<'a, Postgres>, filter: &'a RecipeFilter) {
    let mut sep = " WHERE ";
    if !filter.categories.is_empty() {
        qb.push(sep)
            .push("category::text = ANY(")
            .push_bind(&filter.categories)
            .push(")");
        sep = " AND ";
    }
    if let Some(search) = &filter.search {
        qb.push(sep)
            .push("title ILIKE ")
            .push_bind(format!("%{search}%"));
        sep = " AND ";
    }
    if !filter.ingredients.is_empty() {
        // all listed ingredients must be present, not any-match
        qb.push(sep)
            .push("ingredients @> ")
            .push_bind(&filter.ingredients);
    }
}

/// Runs the listing query plus a matching count. Page and limit are
/// applied exactly as the caller supplied them.
pub async fn list(db: &PgPool, filter: &RecipeFilter) -> anyhow::Result<(Vec<Recipe>, i64)> {
    let mut count_qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM recipes");
    push_filters(&mut count_qb, filter);
    let total: i64 = count_qb.build_query_scalar().fetch_one(db).await?;

    let mut qb =
        QueryBuilder::<Postgres>::new(format!("SELECT {RECIPE_COLUMNS} FROM recipes"));
    push_filters(&mut qb, filter);
    match filter.sort {
        SortOrder::MostLiked => qb.push(" ORDER BY likes DESC, created_at DESC"),
        SortOrder::NewestFirst => qb.push(" ORDER BY created_at DESC"),
    };
    qb.push(" LIMIT ").push_bind(filter.limit);
    qb.push(" OFFSET ").push_bind(filter.offset());

    let rows = qb.build_query_as::<Recipe>().fetch_all(db).await?;
    Ok((rows, total))
}

/// Recipes the user has bookmarked, most recently saved first.
pub async fn list_saved(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Recipe>> {
    let rows = sqlx::query_as::<_, Recipe>(
        r#"
        SELECT r.id, r.user_id, r.title, r.image, r.description, r.total_time_minutes,
               r.ingredients, r.video, r.step_descriptions, r.step_images, r.category,
               r.likes, r.created_at
        FROM recipes r
        JOIN saved_recipes s ON s.recipe_id = r.id
        WHERE s.user_id = $1
        ORDER BY s.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}
