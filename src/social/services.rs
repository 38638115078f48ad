use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::recipes;
use crate::state::AppState;

use super::repo;

/// Which way a toggle flipped the (recipe, user) relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Added,
    Removed,
}

impl Transition {
    pub fn like_message(self) -> &'static str {
        match self {
            Transition::Added => "recipe liked",
            Transition::Removed => "recipe unliked",
        }
    }

    pub fn save_message(self) -> &'static str {
        match self {
            Transition::Added => "recipe saved",
            Transition::Removed => "recipe unsaved",
        }
    }
}

/// Flips the like state for (recipe, user) and keeps the denormalized
/// `recipes.likes` counter in step. The Like row is the source of
/// truth: the counter only moves when a row was actually inserted or
/// deleted, and always by a relative delta inside the same
/// transaction.
pub async fn toggle_like(
    state: &AppState,
    recipe_id: Uuid,
    user_id: Uuid,
) -> Result<Transition, ApiError> {
    if !recipes::repo::exists(&state.db, recipe_id).await? {
        return Err(ApiError::NotFound("recipe"));
    }

    let mut tx = state.db.begin().await?;
    let transition = if repo::delete_like(&mut tx, recipe_id, user_id).await? > 0 {
        repo::bump_likes(&mut tx, recipe_id, -1).await?;
        Transition::Removed
    } else {
        // zero rows means a concurrent toggle already inserted the
        // like and took the +1; the end state is still Present, so
        // Added is the right report and the counter must not move
        if repo::insert_like(&mut tx, recipe_id, user_id).await? > 0 {
            repo::bump_likes(&mut tx, recipe_id, 1).await?;
        }
        Transition::Added
    };
    tx.commit().await?;

    info!(recipe_id = %recipe_id, user_id = %user_id, transition = ?transition, "like toggled");
    Ok(transition)
}

/// Same state machine as [`toggle_like`] but for bookmarks; saves
/// carry no counter side effect.
pub async fn toggle_save(
    state: &AppState,
    recipe_id: Uuid,
    user_id: Uuid,
) -> Result<Transition, ApiError> {
    if !recipes::repo::exists(&state.db, recipe_id).await? {
        return Err(ApiError::NotFound("recipe"));
    }

    let mut tx = state.db.begin().await?;
    let transition = if repo::delete_save(&mut tx, recipe_id, user_id).await? > 0 {
        Transition::Removed
    } else {
        repo::insert_save(&mut tx, recipe_id, user_id).await?;
        Transition::Added
    };
    tx.commit().await?;

    info!(recipe_id = %recipe_id, user_id = %user_id, transition = ?transition, "save toggled");
    Ok(transition)
}
