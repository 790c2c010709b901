//! Table-name sets and schema bootstrap.
//!
//! Every deployment stage keeps its identity data in its own three tables so
//! that test runs never touch production rows. Names are spliced into SQL
//! text, so they are validated as plain identifiers before a [`TableNames`]
//! can exist.

use sqlx::PgPool;

/// Longest accepted table name. Constraint names are derived from table
/// names (`uq_<users>_email`, `fk_<user_roles>_user_id`) and must fit in
/// Postgres's 63-byte identifier limit.
pub const MAX_TABLE_NAME_LEN: usize = 48;

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("unknown deployment stage '{0}'")]
    UnknownStage(String),

    #[error(
        "invalid table name '{0}': expected [A-Za-z_][A-Za-z0-9_]* of at most \
         {MAX_TABLE_NAME_LEN} bytes"
    )]
    InvalidTableName(String),
}

/// The three table names the identity store reads and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableNames {
    users: String,
    roles: String,
    user_roles: String,
}

impl TableNames {
    /// Build a set from explicit names, validating each one.
    pub fn new(
        users: impl Into<String>,
        roles: impl Into<String>,
        user_roles: impl Into<String>,
    ) -> Result<Self, SchemaError> {
        Ok(Self {
            users: validate_identifier(users.into())?,
            roles: validate_identifier(roles.into())?,
            user_roles: validate_identifier(user_roles.into())?,
        })
    }

    /// Default table names for a deployment stage.
    ///
    /// | Stage              | Prefix          |
    /// |--------------------|-----------------|
    /// | `production`       | (none)          |
    /// | `production_test`  | `prod_test_`    |
    /// | `development`      | `dev_`          |
    /// | `development_test` | `test_`         |
    /// | `docker`           | `docker_`       |
    /// | `docker_test`      | `docker_test_`  |
    pub fn for_stage(stage: &str) -> Result<Self, SchemaError> {
        let prefix = match stage {
            "production" => "",
            "production_test" => "prod_test_",
            "development" => "dev_",
            "development_test" => "test_",
            "docker" => "docker_",
            "docker_test" => "docker_test_",
            other => return Err(SchemaError::UnknownStage(other.to_string())),
        };
        Self::new(
            format!("{prefix}users"),
            format!("{prefix}roles"),
            format!("{prefix}user_roles"),
        )
    }

    pub fn users(&self) -> &str {
        &self.users
    }

    pub fn roles(&self) -> &str {
        &self.roles
    }

    pub fn user_roles(&self) -> &str {
        &self.user_roles
    }
}

impl Default for TableNames {
    fn default() -> Self {
        Self {
            users: "users".to_string(),
            roles: "roles".to_string(),
            user_roles: "user_roles".to_string(),
        }
    }
}

fn validate_identifier(name: String) -> Result<String, SchemaError> {
    let mut chars = name.chars();
    let head_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    let tail_ok = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if head_ok && tail_ok && name.len() <= MAX_TABLE_NAME_LEN {
        Ok(name)
    } else {
        Err(SchemaError::InvalidTableName(name))
    }
}

/// Create the users, roles, and user_roles tables if they do not exist.
///
/// Assignments cascade away with their user; a role cannot be deleted while
/// any assignment references it.
pub async fn ensure_schema(pool: &PgPool, tables: &TableNames) -> Result<(), sqlx::Error> {
    let users = tables.users();
    let roles = tables.roles();
    let user_roles = tables.user_roles();

    let statements = [
        format!(
            "CREATE TABLE IF NOT EXISTS {users} (
                user_id      VARCHAR(255) NOT NULL,
                username     VARCHAR(255) NOT NULL,
                password_hash TEXT        NOT NULL,
                email        VARCHAR(255) NOT NULL,
                fullname     VARCHAR(255) NOT NULL,
                phone_number VARCHAR(64),
                avatar       TEXT,
                address      TEXT,
                created_at   TIMESTAMPTZ  NOT NULL DEFAULT NOW(),
                updated_at   TIMESTAMPTZ  NOT NULL DEFAULT NOW(),
                CONSTRAINT pk_{users} PRIMARY KEY (user_id),
                CONSTRAINT uq_{users}_email UNIQUE (email)
            )"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS {roles} (
                role_id     VARCHAR(255) NOT NULL,
                name        VARCHAR(255) NOT NULL,
                description VARCHAR(255) NOT NULL DEFAULT '',
                CONSTRAINT pk_{roles} PRIMARY KEY (role_id),
                CONSTRAINT uq_{roles}_content UNIQUE (name, description)
            )"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS {user_roles} (
                user_id VARCHAR(255) NOT NULL,
                role_id VARCHAR(255) NOT NULL,
                CONSTRAINT pk_{user_roles} PRIMARY KEY (user_id, role_id),
                CONSTRAINT fk_{user_roles}_user_id FOREIGN KEY (user_id)
                    REFERENCES {users} (user_id) ON DELETE CASCADE,
                CONSTRAINT fk_{user_roles}_role_id FOREIGN KEY (role_id)
                    REFERENCES {roles} (role_id) ON DELETE RESTRICT
            )"
        ),
        format!("CREATE INDEX IF NOT EXISTS idx_{user_roles}_role_id ON {user_roles} (role_id)"),
    ];

    let mut tx = pool.begin().await?;
    for statement in &statements {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;

    tracing::info!(users, roles, user_roles, "Identity schema ready");
    Ok(())
}

/// Drop the three tables, assignments first.
pub async fn drop_schema(pool: &PgPool, tables: &TableNames) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    for table in [tables.user_roles(), tables.roles(), tables.users()] {
        sqlx::query(&format!("DROP TABLE IF EXISTS {table}"))
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;

    tracing::warn!(
        users = tables.users(),
        roles = tables.roles(),
        user_roles = tables.user_roles(),
        "Identity schema dropped"
    );
    Ok(())
}
