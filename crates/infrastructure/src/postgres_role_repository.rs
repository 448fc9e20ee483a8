use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use rolegate_application::{NewRoleDocument, RoleRepository};
use rolegate_core::{AppError, AppResult, RoleId};
use rolegate_domain::{ApplicationScope, Permission, RoleDocument};

/// PostgreSQL-backed role store.
#[derive(Clone)]
pub struct PostgresRoleRepository {
    pool: PgPool,
}

impl PostgresRoleRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct RoleRow {
    id: uuid::Uuid,
    name: String,
    application: String,
    permissions: Vec<String>,
    version: i64,
}

impl TryFrom<RoleRow> for RoleDocument {
    type Error = AppError;

    fn try_from(row: RoleRow) -> Result<Self, Self::Error> {
        let version = u64::try_from(row.version).map_err(|error| {
            AppError::Internal(format!("role '{}' has invalid version: {error}", row.id))
        })?;

        RoleDocument::from_stored(
            RoleId::from_uuid(row.id),
            row.name,
            row.application,
            row.permissions,
            version,
        )
    }
}

fn into_documents(rows: Vec<RoleRow>) -> AppResult<Vec<RoleDocument>> {
    rows.into_iter().map(RoleDocument::try_from).collect()
}

fn storage_permissions<'a>(permissions: impl IntoIterator<Item = &'a Permission>) -> Vec<String> {
    permissions
        .into_iter()
        .map(|permission| permission.as_str().to_owned())
        .collect()
}

#[async_trait]
impl RoleRepository for PostgresRoleRepository {
    async fn create_role(&self, input: NewRoleDocument) -> AppResult<RoleDocument> {
        let document = RoleDocument::new(
            RoleId::new(),
            input.name,
            input.application,
            input.permissions,
        );

        let row = sqlx::query_as::<_, RoleRow>(
            r#"
            INSERT INTO roles (id, name, application, permissions, version)
            VALUES ($1, $2, $3, $4, 1)
            RETURNING id, name, application, permissions, version
            "#,
        )
        .bind(document.role_id().as_uuid())
        .bind(document.name().as_str())
        .bind(document.application().as_str())
        .bind(storage_permissions(document.permissions()))
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            map_role_conflict(error, document.name().as_str(), document.application())
        })?;

        RoleDocument::try_from(row)
    }

    async fn add_permissions(
        &self,
        role_id: RoleId,
        permissions: Vec<Permission>,
    ) -> AppResult<RoleDocument> {
        let row = sqlx::query_as::<_, RoleRow>(
            r#"
            UPDATE roles
            SET permissions = ARRAY(
                    SELECT DISTINCT merged.permission
                    FROM unnest(roles.permissions || $2::text[]) AS merged(permission)
                    ORDER BY merged.permission
                ),
                version = version + 1,
                updated_at = now()
            WHERE id = $1
            RETURNING id, name, application, permissions, version
            "#,
        )
        .bind(role_id.as_uuid())
        .bind(storage_permissions(&permissions))
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to merge role permissions: {error}")))?
        .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' was not found")))?;

        RoleDocument::try_from(row)
    }

    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<RoleDocument>> {
        sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, name, application, permissions, version
            FROM roles
            WHERE id = $1
            "#,
        )
        .bind(role_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load role: {error}")))?
        .map(RoleDocument::try_from)
        .transpose()
    }

    async fn find_by_name_and_scope(
        &self,
        name: &str,
        application: &ApplicationScope,
    ) -> AppResult<Option<RoleDocument>> {
        sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, name, application, permissions, version
            FROM roles
            WHERE name = $1 AND application = $2
            "#,
        )
        .bind(name)
        .bind(application.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to resolve role: {error}")))?
        .map(RoleDocument::try_from)
        .transpose()
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Vec<RoleDocument>> {
        let rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, name, application, permissions, version
            FROM roles
            WHERE name = $1
            ORDER BY application
            "#,
        )
        .bind(name)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list roles by name: {error}")))?;

        into_documents(rows)
    }

    async fn find_by_ids(&self, role_ids: &[RoleId]) -> AppResult<Vec<RoleDocument>> {
        if role_ids.is_empty() {
            return Err(AppError::NotFound("no role ids were given".to_owned()));
        }

        let ids: Vec<uuid::Uuid> = role_ids.iter().map(RoleId::as_uuid).collect();
        let rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, name, application, permissions, version
            FROM roles
            WHERE id = ANY($1)
            ORDER BY name, application
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load roles by id: {error}")))?;

        if rows.is_empty() {
            return Err(AppError::NotFound(
                "none of the given role ids exist".to_owned(),
            ));
        }

        into_documents(rows)
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(role_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| {
                if let sqlx::Error::Database(database_error) = &error
                    && database_error.code().as_deref() == Some("23503")
                {
                    return AppError::Conflict(format!(
                        "role '{role_id}' is still assigned to principals"
                    ));
                }

                AppError::Internal(format!("failed to delete role: {error}"))
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("role '{role_id}' was not found")));
        }

        Ok(())
    }

    async fn list_roles(
        &self,
        application: Option<&ApplicationScope>,
    ) -> AppResult<Vec<RoleDocument>> {
        let rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, name, application, permissions, version
            FROM roles
            WHERE $1::text IS NULL OR application = $1
            ORDER BY name, application
            "#,
        )
        .bind(application.map(ApplicationScope::as_str))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list roles: {error}")))?;

        into_documents(rows)
    }
}

fn map_role_conflict(error: sqlx::Error, name: &str, application: &ApplicationScope) -> AppError {
    if let sqlx::Error::Database(database_error) = &error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Conflict(format!(
            "role '{name}' already exists for application '{application}'"
        ));
    }

    AppError::Internal(format!("failed to create role: {error}"))
}
