use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::recipes::dto::{CreateRecipeRequest, EditRecipeRequest};
use crate::recipes::repo::{self, Recipe};
use crate::state::AppState;

/// Creates the recipe aggregate: ingredients are normalized to the
/// nutrition service's language, analyzed, and the recipe plus its
/// nutrition record land in one transaction. The stored ingredient
/// list stays in the author's original language.
pub async fn create_recipe(
    state: &AppState,
    user_id: Uuid,
    req: CreateRecipeRequest,
) -> Result<Recipe, ApiError> {
    if req.ingredients.is_empty() {
        return Err(ApiError::BadRequest("ingredients must not be empty"));
    }

    let normalized = state.translator.translate(&req.ingredients).await?;
    let facts = state.nutrition.analyze(&normalized).await?;

    let recipe = repo::insert_with_nutrition(&state.db, user_id, &req, &facts).await?;
    info!(recipe_id = %recipe.id, user_id = %user_id, "recipe created");
    Ok(recipe)
}

/// Only the creating user may mutate a recipe.
fn ensure_owner(recipe: &Recipe, editor_id: Uuid) -> Result<(), ApiError> {
    if recipe.user_id != editor_id {
        return Err(ApiError::Forbidden);
    }
    Ok(())
}

/// Merges an edit request into the stored recipe. Returns whether the
/// ingredient list was touched, which obligates a full nutrition
/// re-resolution — even when the new list equals the old one.
fn apply_edit(recipe: &mut Recipe, req: &EditRecipeRequest) -> bool {
    if let Some(title) = &req.title {
        if !title.is_empty() {
            recipe.title = title.clone();
        }
    }
    if let Some(image) = &req.image {
        if !image.is_empty() {
            recipe.image = Some(image.clone());
        }
    }
    if let Some(description) = &req.description {
        if !description.is_empty() {
            recipe.description = Some(description.clone());
        }
    }
    if let Some(minutes) = req.total_time_minutes {
        if minutes != 0 {
            recipe.total_time_minutes = minutes;
        }
    }
    if let Some(video) = &req.video {
        if !video.is_empty() {
            recipe.video = Some(video.clone());
        }
    }
    if let Some(category) = req.category {
        recipe.category = category;
    }

    // steps only change when both sides arrive and line up pairwise
    if let (Some(descriptions), Some(images)) = (&req.step_descriptions, &req.step_images) {
        if descriptions.len() == images.len() {
            recipe.step_descriptions = descriptions.clone();
            recipe.step_images = images.clone();
        }
    }

    match &req.ingredients {
        Some(list) if !list.is_empty() => {
            recipe.ingredients = list.clone();
            true
        }
        _ => false,
    }
}

/// Edits a recipe the caller owns. A non-empty incoming ingredient
/// list re-runs translation and nutrition analysis; recipe and
/// nutrition updates commit together or not at all.
pub async fn edit_recipe(
    state: &AppState,
    recipe_id: Uuid,
    editor_id: Uuid,
    req: EditRecipeRequest,
) -> Result<Recipe, ApiError> {
    let mut recipe = repo::find_by_id(&state.db, recipe_id)
        .await?
        .ok_or(ApiError::NotFound("recipe"))?;
    ensure_owner(&recipe, editor_id)?;

    let reresolve = apply_edit(&mut recipe, &req);
    let facts = if reresolve {
        let normalized = state.translator.translate(&recipe.ingredients).await?;
        Some(state.nutrition.analyze(&normalized).await?)
    } else {
        None
    };

    repo::update_with_nutrition(&state.db, &recipe, facts.as_ref()).await?;
    info!(recipe_id = %recipe.id, reresolved = reresolve, "recipe updated");
    Ok(recipe)
}

pub async fn delete_recipe(
    state: &AppState,
    recipe_id: Uuid,
    requester_id: Uuid,
) -> Result<(), ApiError> {
    let recipe = repo::find_by_id(&state.db, recipe_id)
        .await?
        .ok_or(ApiError::NotFound("recipe"))?;
    ensure_owner(&recipe, requester_id)?;

    repo::delete(&state.db, recipe_id).await?;
    info!(recipe_id = %recipe_id, "recipe deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipes::repo::RecipeCategory;
    use time::OffsetDateTime;

    fn stored_recipe() -> Recipe {
        Recipe {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "Nasi goreng".into(),
            image: Some("nasi.jpg".into()),
            description: Some("Fried rice".into()),
            total_time_minutes: 25,
            ingredients: vec!["telur".into(), "nasi".into()],
            video: None,
            step_descriptions: vec!["fry".into(), "serve".into()],
            step_images: vec!["s1.jpg".into(), "s2.jpg".into()],
            category: RecipeCategory::Dinner,
            likes: 3,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn owner_passes_the_ownership_check() {
        let recipe = stored_recipe();
        assert!(ensure_owner(&recipe, recipe.user_id).is_ok());
    }

    #[test]
    fn non_owner_is_forbidden_and_recipe_stays_unchanged() {
        let recipe = stored_recipe();
        let err = ensure_owner(&recipe, Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, ApiError::Forbidden));

        // edit_recipe runs this check before apply_edit, so a rejected
        // editor's request never reaches the stored recipe
        assert_eq!(recipe.title, "Nasi goreng");
        assert_eq!(recipe.ingredients, vec!["telur", "nasi"]);
    }

    #[test]
    fn present_fields_overwrite() {
        let mut recipe = stored_recipe();
        let req = EditRecipeRequest {
            title: Some("Nasi goreng spesial".into()),
            total_time_minutes: Some(30),
            category: Some(RecipeCategory::Lunch),
            ..Default::default()
        };
        let reresolve = apply_edit(&mut recipe, &req);
        assert!(!reresolve);
        assert_eq!(recipe.title, "Nasi goreng spesial");
        assert_eq!(recipe.total_time_minutes, 30);
        assert_eq!(recipe.category, RecipeCategory::Lunch);
        // untouched fields survive
        assert_eq!(recipe.description.as_deref(), Some("Fried rice"));
    }

    #[test]
    fn empty_values_cannot_clear_fields() {
        let mut recipe = stored_recipe();
        let req = EditRecipeRequest {
            title: Some("".into()),
            image: Some("".into()),
            total_time_minutes: Some(0),
            ..Default::default()
        };
        apply_edit(&mut recipe, &req);
        assert_eq!(recipe.title, "Nasi goreng");
        assert_eq!(recipe.image.as_deref(), Some("nasi.jpg"));
        assert_eq!(recipe.total_time_minutes, 25);
    }

    #[test]
    fn empty_ingredient_list_leaves_nutrition_alone() {
        let mut recipe = stored_recipe();
        let req = EditRecipeRequest {
            ingredients: Some(vec![]),
            ..Default::default()
        };
        assert!(!apply_edit(&mut recipe, &req));
        assert_eq!(recipe.ingredients, vec!["telur", "nasi"]);
    }

    #[test]
    fn identical_ingredient_list_still_triggers_reresolution() {
        let mut recipe = stored_recipe();
        let req = EditRecipeRequest {
            ingredients: Some(vec!["telur".into(), "nasi".into()]),
            ..Default::default()
        };
        // no diffing: any non-empty list re-resolves
        assert!(apply_edit(&mut recipe, &req));
    }

    #[test]
    fn new_ingredients_overwrite_and_reresolve() {
        let mut recipe = stored_recipe();
        let req = EditRecipeRequest {
            ingredients: Some(vec!["ayam".into()]),
            ..Default::default()
        };
        assert!(apply_edit(&mut recipe, &req));
        assert_eq!(recipe.ingredients, vec!["ayam"]);
    }

    #[test]
    fn steps_replaced_only_when_lengths_match() {
        let mut recipe = stored_recipe();
        let req = EditRecipeRequest {
            step_descriptions: Some(vec!["chop".into()]),
            step_images: Some(vec!["a.jpg".into(), "b.jpg".into()]),
            ..Default::default()
        };
        apply_edit(&mut recipe, &req);
        assert_eq!(recipe.step_descriptions, vec!["fry", "serve"]);
        assert_eq!(recipe.step_images, vec!["s1.jpg", "s2.jpg"]);

        let req = EditRecipeRequest {
            step_descriptions: Some(vec!["chop".into()]),
            step_images: Some(vec!["a.jpg".into()]),
            ..Default::default()
        };
        apply_edit(&mut recipe, &req);
        assert_eq!(recipe.step_descriptions, vec!["chop"]);
        assert_eq!(recipe.step_images, vec!["a.jpg"]);
    }

    #[test]
    fn steps_untouched_when_one_side_missing() {
        let mut recipe = stored_recipe();
        let req = EditRecipeRequest {
            step_descriptions: Some(vec!["chop".into(), "boil".into()]),
            ..Default::default()
        };
        apply_edit(&mut recipe, &req);
        assert_eq!(recipe.step_descriptions, vec!["fry", "serve"]);
    }

    #[tokio::test]
    async fn create_rejects_empty_ingredients_before_any_external_call() {
        let state = AppState::fake();
        let req = CreateRecipeRequest {
            title: "Empty".into(),
            image: None,
            description: None,
            total_time_minutes: 10,
            ingredients: vec![],
            video: None,
            step_descriptions: vec![],
            step_images: vec![],
            category: RecipeCategory::Snack,
        };
        let err = create_recipe(&state, Uuid::new_v4(), req).await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }
}
