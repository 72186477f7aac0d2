/// Connection-request operations
///
/// Rows are keyed on the normalized (user_low, user_high) pair so a request
/// and its reverse can never both exist.
use crate::error::{IdentityError, Result};
use crate::models::connection::{pair_key, Connection, ConnectionStatus};
use sqlx::PgPool;
use uuid::Uuid;

const CONNECTION_COLUMNS: &str =
    "id, requester_id, addressee_id, status, created_at, updated_at";

/// Create a pending request. Fails with a conflict if any row (either
/// direction, any status) already exists for the pair.
pub async fn request(pool: &PgPool, requester_id: Uuid, addressee_id: Uuid) -> Result<Connection> {
    if requester_id == addressee_id {
        return Err(IdentityError::Validation(
            "Cannot connect to yourself".to_string(),
        ));
    }

    let (low, high) = pair_key(requester_id, addressee_id);

    let inserted = sqlx::query_as::<_, Connection>(&format!(
        r#"
        INSERT INTO connections (requester_id, addressee_id, user_low, user_high, status)
        VALUES ($1, $2, $3, $4, 'pending')
        ON CONFLICT (user_low, user_high) DO NOTHING
        RETURNING {CONNECTION_COLUMNS}
        "#
    ))
    .bind(requester_id)
    .bind(addressee_id)
    .bind(low)
    .bind(high)
    .fetch_optional(pool)
    .await?;

    inserted.ok_or_else(|| {
        IdentityError::Conflict("A connection between these users already exists".to_string())
    })
}

/// Accept or reject a pending request. Only the addressee may respond.
pub async fn respond(
    pool: &PgPool,
    connection_id: Uuid,
    responder_id: Uuid,
    status: ConnectionStatus,
) -> Result<Connection> {
    if status == ConnectionStatus::Pending {
        return Err(IdentityError::Validation(
            "Response must be accepted or rejected".to_string(),
        ));
    }

    let row = sqlx::query_as::<_, Connection>(&format!(
        "SELECT {CONNECTION_COLUMNS} FROM connections WHERE id = $1"
    ))
    .bind(connection_id)
    .fetch_optional(pool)
    .await?
    .ok_or(IdentityError::UserNotFound)?;

    if row.addressee_id != responder_id {
        return Err(IdentityError::Forbidden(
            "Only the request addressee can respond".to_string(),
        ));
    }
    if row.status != ConnectionStatus::Pending.as_str() {
        return Err(IdentityError::Conflict(
            "Request has already been answered".to_string(),
        ));
    }

    let updated = sqlx::query_as::<_, Connection>(&format!(
        r#"
        UPDATE connections
        SET status = $2, updated_at = NOW()
        WHERE id = $1 AND status = 'pending'
        RETURNING {CONNECTION_COLUMNS}
        "#
    ))
    .bind(connection_id)
    .bind(status.as_str())
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| IdentityError::Conflict("Request has already been answered".to_string()))?;

    Ok(updated)
}

/// The Connection Gate: true iff an accepted connection exists between the
/// unordered pair.
pub async fn is_connected(pool: &PgPool, a: Uuid, b: Uuid) -> Result<bool> {
    let (low, high) = pair_key(a, b);

    let exists: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM connections
            WHERE user_low = $1 AND user_high = $2 AND status = 'accepted'
        )
        "#,
    )
    .bind(low)
    .bind(high)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}

/// All accepted connections involving the user
pub async fn accepted_for(pool: &PgPool, user_id: Uuid) -> Result<Vec<Connection>> {
    let rows = sqlx::query_as::<_, Connection>(&format!(
        r#"
        SELECT {CONNECTION_COLUMNS} FROM connections
        WHERE (requester_id = $1 OR addressee_id = $1) AND status = 'accepted'
        ORDER BY updated_at DESC
        "#
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Incoming requests awaiting the user's response
pub async fn pending_for(pool: &PgPool, user_id: Uuid) -> Result<Vec<Connection>> {
    let rows = sqlx::query_as::<_, Connection>(&format!(
        r#"
        SELECT {CONNECTION_COLUMNS} FROM connections
        WHERE addressee_id = $1 AND status = 'pending'
        ORDER BY created_at DESC
        "#
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
