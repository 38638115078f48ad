use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

pub async fn has_liked(db: &PgPool, recipe_id: Uuid, user_id: Uuid) -> anyhow::Result<bool> {
    let found: Option<i32> =
        sqlx::query_scalar("SELECT 1 FROM likes WHERE recipe_id = $1 AND user_id = $2")
            .bind(recipe_id)
            .bind(user_id)
            .fetch_optional(db)
            .await?;
    Ok(found.is_some())
}

pub async fn delete_like(
    conn: &mut PgConnection,
    recipe_id: Uuid,
    user_id: Uuid,
) -> anyhow::Result<u64> {
    let res = sqlx::query("DELETE FROM likes WHERE recipe_id = $1 AND user_id = $2")
        .bind(recipe_id)
        .bind(user_id)
        .execute(conn)
        .await?;
    Ok(res.rows_affected())
}

/// Insert guarded by the unique (recipe_id, user_id) index; a racing
/// duplicate simply affects zero rows.
pub async fn insert_like(
    conn: &mut PgConnection,
    recipe_id: Uuid,
    user_id: Uuid,
) -> anyhow::Result<u64> {
    let res = sqlx::query(
        r#"
        INSERT INTO likes (recipe_id, user_id)
        VALUES ($1, $2)
        ON CONFLICT (recipe_id, user_id) DO NOTHING
        "#,
    )
    .bind(recipe_id)
    .bind(user_id)
    .execute(conn)
    .await?;
    Ok(res.rows_affected())
}

/// Relative counter update. Always increment-by-delta in SQL, never a
/// value computed in memory, so concurrent toggles cannot lose an
/// update.
pub async fn bump_likes(conn: &mut PgConnection, recipe_id: Uuid, delta: i64) -> anyhow::Result<()> {
    sqlx::query("UPDATE recipes SET likes = likes + $2 WHERE id = $1")
        .bind(recipe_id)
        .bind(delta)
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn delete_save(
    conn: &mut PgConnection,
    recipe_id: Uuid,
    user_id: Uuid,
) -> anyhow::Result<u64> {
    let res = sqlx::query("DELETE FROM saved_recipes WHERE recipe_id = $1 AND user_id = $2")
        .bind(recipe_id)
        .bind(user_id)
        .execute(conn)
        .await?;
    Ok(res.rows_affected())
}

pub async fn insert_save(
    conn: &mut PgConnection,
    recipe_id: Uuid,
    user_id: Uuid,
) -> anyhow::Result<u64> {
    let res = sqlx::query(
        r#"
        INSERT INTO saved_recipes (recipe_id, user_id)
        VALUES ($1, $2)
        ON CONFLICT (recipe_id, user_id) DO NOTHING
        "#,
    )
    .bind(recipe_id)
    .bind(user_id)
    .execute(conn)
    .await?;
    Ok(res.rows_affected())
}
