use crate::error::{DatabaseError, Result};
use saml2_models::{CreateTenant, Tenant, UpdateTenant};
use saml2_models::tenant::DEFAULT_NAME_ID_FORMAT;
use sqlx::PgPool;
use uuid::Uuid;

pub struct TenantRepository {
    pool: PgPool,
}

impl TenantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new tenant with a freshly assigned UUID
    pub async fn create(&self, request: &CreateTenant) -> Result<Tenant> {
        let metadata = request.metadata.clone().unwrap_or_else(|| serde_json::json!({}));
        let name_id_format = request
            .name_id_format
            .clone()
            .unwrap_or_else(|| DEFAULT_NAME_ID_FORMAT.to_string());

        let tenant = sqlx::query_as::<_, Tenant>(
            r#"
            INSERT INTO tenants
                (uuid, key, idp_entity_id, idp_login_url, idp_logout_url,
                 idp_x509_cert, relay_state_url, name_id_format, metadata)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&request.key)
        .bind(&request.idp_entity_id)
        .bind(&request.idp_login_url)
        .bind(&request.idp_logout_url)
        .bind(&request.idp_x509_cert)
        .bind(&request.relay_state_url)
        .bind(&name_id_format)
        .bind(sqlx::types::Json(&metadata))
        .fetch_one(&self.pool)
        .await?;

        Ok(tenant)
    }

    /// Find tenant by primary id
    pub async fn find_by_id(&self, id: i64) -> Result<Tenant> {
        let tenant = sqlx::query_as::<_, Tenant>("SELECT * FROM tenants WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Tenant", &id.to_string()))?;

        Ok(tenant)
    }

    /// Find a non-deleted tenant by UUID
    pub async fn find_by_uuid(&self, uuid: Uuid) -> Result<Tenant> {
        let tenant = sqlx::query_as::<_, Tenant>(
            "SELECT * FROM tenants WHERE uuid = $1 AND deleted_at IS NULL",
        )
        .bind(uuid)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Tenant", &uuid.to_string()))?;

        Ok(tenant)
    }

    /// Find a non-deleted tenant by key
    pub async fn find_by_key(&self, key: &str) -> Result<Tenant> {
        let tenant = sqlx::query_as::<_, Tenant>(
            "SELECT * FROM tenants WHERE key = $1 AND deleted_at IS NULL",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Tenant", key))?;

        Ok(tenant)
    }

    /// Find every tenant whose UUID or key equals the given identifier.
    ///
    /// The resolver owns the soft-delete rejection, so when
    /// `include_deleted` is set the query must not pre-filter deleted rows.
    /// The identifier may match more than one row (one tenant's key can
    /// collide with another's UUID text); callers decide what many means.
    pub async fn find_by_any_identifier(
        &self,
        identifier: &str,
        include_deleted: bool,
    ) -> Result<Vec<Tenant>> {
        let sql = if include_deleted {
            "SELECT * FROM tenants WHERE uuid::text = $1 OR key = $1 ORDER BY id"
        } else {
            "SELECT * FROM tenants WHERE (uuid::text = $1 OR key = $1) AND deleted_at IS NULL ORDER BY id"
        };

        let tenants = sqlx::query_as::<_, Tenant>(sql)
            .bind(identifier)
            .fetch_all(&self.pool)
            .await?;

        Ok(tenants)
    }

    /// List non-deleted tenants - paginated
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Tenant>> {
        let tenants = sqlx::query_as::<_, Tenant>(
            r#"
            SELECT * FROM tenants
            WHERE deleted_at IS NULL
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(tenants)
    }

    /// Count non-deleted tenants
    pub async fn count(&self) -> Result<i64> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM tenants WHERE deleted_at IS NULL")
                .fetch_one(&self.pool)
                .await?;

        Ok(count.0)
    }

    /// Update tenant (partial update)
    pub async fn update(&self, id: i64, request: &UpdateTenant) -> Result<Tenant> {
        // Get current tenant for fallback values
        let current = self.find_by_id(id).await?;

        let key = request.key.as_ref().unwrap_or(&current.key);
        let idp_entity_id = request.idp_entity_id.as_ref().unwrap_or(&current.idp_entity_id);
        let idp_login_url = request.idp_login_url.as_ref().unwrap_or(&current.idp_login_url);
        let idp_logout_url = request.idp_logout_url.as_ref().unwrap_or(&current.idp_logout_url);
        let idp_x509_cert = request.idp_x509_cert.as_ref().unwrap_or(&current.idp_x509_cert);
        let relay_state_url = request.relay_state_url.as_ref().or(current.relay_state_url.as_ref());
        let name_id_format = request.name_id_format.as_ref().unwrap_or(&current.name_id_format);
        let metadata = request.metadata.as_ref().unwrap_or(&current.metadata);

        let tenant = sqlx::query_as::<_, Tenant>(
            r#"
            UPDATE tenants
            SET key = $1, idp_entity_id = $2, idp_login_url = $3, idp_logout_url = $4,
                idp_x509_cert = $5, relay_state_url = $6, name_id_format = $7,
                metadata = $8, updated_at = NOW()
            WHERE id = $9
            RETURNING *
            "#,
        )
        .bind(key)
        .bind(idp_entity_id)
        .bind(idp_login_url)
        .bind(idp_logout_url)
        .bind(idp_x509_cert)
        .bind(relay_state_url)
        .bind(name_id_format)
        .bind(sqlx::types::Json(metadata))
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(tenant)
    }

    /// Soft-delete a tenant: the row stays for audit, resolution stops
    /// seeing it
    pub async fn soft_delete(&self, id: i64) -> Result<Tenant> {
        let tenant = sqlx::query_as::<_, Tenant>(
            r#"
            UPDATE tenants
            SET deleted_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Tenant", &id.to_string()))?;

        Ok(tenant)
    }

    /// Clear a tenant's deletion mark
    pub async fn restore(&self, id: i64) -> Result<Tenant> {
        let tenant = sqlx::query_as::<_, Tenant>(
            r#"
            UPDATE tenants
            SET deleted_at = NULL, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NOT NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Tenant", &id.to_string()))?;

        Ok(tenant)
    }
}
