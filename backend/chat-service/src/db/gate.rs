use crate::error::Result;
use sqlx::PgPool;
use uuid::Uuid;

/// The connection gate: two users may exchange messages only once a
/// connection request between them has been accepted. Reads the
/// identity-owned `connections` table in the shared database.
pub async fn is_connected(pool: &PgPool, a: Uuid, b: Uuid) -> Result<bool> {
    let connected = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(
             SELECT 1 FROM connections
             WHERE user_low = LEAST($1, $2)
               AND user_high = GREATEST($1, $2)
               AND status = 'accepted'
         )",
    )
    .bind(a)
    .bind(b)
    .fetch_one(pool)
    .await?;

    Ok(connected)
}
