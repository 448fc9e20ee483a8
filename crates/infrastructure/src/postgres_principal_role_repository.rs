use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use rolegate_application::PrincipalRoleRepository;
use rolegate_core::{AppError, AppResult, RoleId};

/// PostgreSQL-backed principal store holding role references.
#[derive(Clone)]
pub struct PostgresPrincipalRoleRepository {
    pool: PgPool,
}

impl PostgresPrincipalRoleRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn held_references(
    transaction: &mut Transaction<'_, Postgres>,
    principal_id: &str,
) -> AppResult<Vec<RoleId>> {
    let ids = sqlx::query_scalar::<_, uuid::Uuid>(
        r#"
        SELECT role_id
        FROM principal_role_references
        WHERE principal_id = $1
        ORDER BY assigned_at, role_id
        "#,
    )
    .bind(principal_id)
    .fetch_all(&mut **transaction)
    .await
    .map_err(|error| AppError::Internal(format!("failed to list role references: {error}")))?;

    Ok(ids.into_iter().map(RoleId::from_uuid).collect())
}

#[async_trait]
impl PrincipalRoleRepository for PostgresPrincipalRoleRepository {
    async fn list_role_references(&self, principal_id: &str) -> AppResult<Vec<RoleId>> {
        let ids = sqlx::query_scalar::<_, uuid::Uuid>(
            r#"
            SELECT role_id
            FROM principal_role_references
            WHERE principal_id = $1
            ORDER BY assigned_at, role_id
            "#,
        )
        .bind(principal_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list role references: {error}")))?;

        Ok(ids.into_iter().map(RoleId::from_uuid).collect())
    }

    async fn replace_role_reference(
        &self,
        principal_id: &str,
        role_id: RoleId,
        superseded: &[RoleId],
    ) -> AppResult<Vec<RoleId>> {
        let mut transaction =
            self.pool.begin().await.map_err(|error| {
                AppError::Internal(format!("failed to begin transaction: {error}"))
            })?;

        let superseded: Vec<uuid::Uuid> = superseded.iter().map(RoleId::as_uuid).collect();
        sqlx::query(
            r#"
            DELETE FROM principal_role_references
            WHERE principal_id = $1 AND role_id = ANY($2)
            "#,
        )
        .bind(principal_id)
        .bind(superseded)
        .execute(&mut *transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to drop superseded role references: {error}"))
        })?;

        sqlx::query(
            r#"
            INSERT INTO principal_role_references (principal_id, role_id)
            VALUES ($1, $2)
            ON CONFLICT (principal_id, role_id) DO NOTHING
            "#,
        )
        .bind(principal_id)
        .bind(role_id.as_uuid())
        .execute(&mut *transaction)
        .await
        .map_err(|error| {
            if let sqlx::Error::Database(database_error) = &error
                && database_error.code().as_deref() == Some("23503")
            {
                return AppError::NotFound(format!("role '{role_id}' was not found"));
            }

            AppError::Internal(format!("failed to add role reference: {error}"))
        })?;

        let held = held_references(&mut transaction, principal_id).await?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        Ok(held)
    }

    async fn remove_role_reference(
        &self,
        principal_id: &str,
        role_id: RoleId,
    ) -> AppResult<Vec<RoleId>> {
        let mut transaction =
            self.pool.begin().await.map_err(|error| {
                AppError::Internal(format!("failed to begin transaction: {error}"))
            })?;

        let result = sqlx::query(
            r#"
            DELETE FROM principal_role_references
            WHERE principal_id = $1 AND role_id = $2
            "#,
        )
        .bind(principal_id)
        .bind(role_id.as_uuid())
        .execute(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to remove role reference: {error}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "principal '{principal_id}' does not hold role '{role_id}'"
            )));
        }

        let held = held_references(&mut transaction, principal_id).await?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        Ok(held)
    }

    async fn count_role_references(&self, role_id: RoleId) -> AppResult<u64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM principal_role_references
            WHERE role_id = $1
            "#,
        )
        .bind(role_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to count role references: {error}")))?;

        u64::try_from(count)
            .map_err(|error| AppError::Internal(format!("invalid reference count: {error}")))
    }
}
