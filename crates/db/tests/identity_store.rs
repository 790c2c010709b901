//! Integration tests for the Postgres identity store.
//!
//! Exercises the adapter against a real database:
//! - User and role CRUD through `PgIdentityStore`
//! - Unique, foreign-key, and not-found classification
//! - Cascade on user delete, restrict on role delete
//! - The access service end to end over Postgres

use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::Utc;
use gatehouse_core::error::CoreError;
use gatehouse_core::identity::{NewRole, NewUser, ProfileUpdate, Role, User, UserRole};
use gatehouse_core::service::AccessService;
use gatehouse_core::store::{IdentityStore, StoreError};
use gatehouse_core::token::{SigningSecret, TokenIssuer};
use gatehouse_core::types::new_entity_id;
use gatehouse_db::schema::ensure_schema;
use gatehouse_db::{PgIdentityStore, TableNames};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn store(pool: PgPool) -> PgIdentityStore {
    let tables = TableNames::for_stage("development_test").unwrap();
    ensure_schema(&pool, &tables).await.unwrap();
    PgIdentityStore::new(pool, tables)
}

fn user(username: &str) -> User {
    let now = Utc::now();
    User {
        user_id: new_entity_id(),
        username: username.to_string(),
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$aGFzaGhhc2g".to_string(),
        email: format!("{username}@example.com"),
        fullname: "Test User".to_string(),
        phone_number: Some("1234567890".to_string()),
        avatar: None,
        address: Some("123 Main St".to_string()),
        created_at: now,
        updated_at: now,
    }
}

fn role(name: &str, description: &str) -> Role {
    Role {
        role_id: new_entity_id(),
        name: name.to_string(),
        description: description.to_string(),
    }
}

fn assignment(user: &User, role: &Role) -> UserRole {
    UserRole {
        user_id: user.user_id.clone(),
        role_id: role.role_id.clone(),
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = false)]
async fn test_insert_and_find_user(pool: PgPool) {
    let store = store(pool).await;
    let input = user("john_doe");

    let created = store.insert_user(&input).await.unwrap();
    assert_eq!(created.user_id, input.user_id);
    assert_eq!(created.password_hash, input.password_hash);

    let by_id = store.find_user_by_id(&input.user_id).await.unwrap();
    assert_eq!(by_id.email, "john_doe@example.com");

    let by_email = store.find_user_by_email("john_doe@example.com").await.unwrap();
    assert_eq!(by_email.user_id, input.user_id);
}

#[sqlx::test(migrations = false)]
async fn test_missing_user_is_not_found(pool: PgPool) {
    let store = store(pool).await;
    assert_matches!(store.find_user_by_id("nope").await, Err(StoreError::NotFound));
    assert_matches!(
        store.find_user_by_email("nobody@example.com").await,
        Err(StoreError::NotFound)
    );
    assert_matches!(store.delete_user("nope").await, Err(StoreError::NotFound));
}

#[sqlx::test(migrations = false)]
async fn test_duplicate_email_rejected(pool: PgPool) {
    let store = store(pool).await;
    store.insert_user(&user("dup")).await.unwrap();

    let result = store.insert_user(&user("dup")).await;
    assert_matches!(
        result,
        Err(StoreError::UniqueViolation { constraint }) if constraint == "uq_test_users_email"
    );
}

#[sqlx::test(migrations = false)]
async fn test_update_profile_leaves_hash(pool: PgPool) {
    let store = store(pool).await;
    let original = store.insert_user(&user("mary")).await.unwrap();

    let profile = ProfileUpdate {
        username: "mary_j".into(),
        email: "mary.j@example.com".into(),
        fullname: "Mary J".into(),
        phone_number: None,
        avatar: Some("https://img.example.com/m.png".into()),
        address: None,
    };
    let updated = store
        .update_user_profile(&original.user_id, &profile, Utc::now())
        .await
        .unwrap();

    assert_eq!(updated.username, "mary_j");
    assert_eq!(updated.phone_number, None);
    assert_eq!(updated.password_hash, original.password_hash);
    assert!(updated.updated_at >= original.updated_at);

    let missing = store
        .update_user_profile("nope", &profile, Utc::now())
        .await;
    assert_matches!(missing, Err(StoreError::NotFound));
}

#[sqlx::test(migrations = false)]
async fn test_update_password(pool: PgPool) {
    let store = store(pool).await;
    let original = store.insert_user(&user("rotate")).await.unwrap();

    let updated = store
        .update_user_password(&original.user_id, "$argon2id$new", Utc::now())
        .await
        .unwrap();
    assert_eq!(updated.password_hash, "$argon2id$new");
    assert_eq!(updated.email, original.email);
}

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = false)]
async fn test_role_content_is_unique(pool: PgPool) {
    let store = store(pool).await;
    let admin = store.insert_role(&role("Admin", "x")).await.unwrap();

    assert_matches!(
        store.insert_role(&role("Admin", "x")).await,
        Err(StoreError::UniqueViolation { .. })
    );
    // Same name, different description is a different role.
    store.insert_role(&role("Admin", "y")).await.unwrap();

    let found = store.find_role_by_content("Admin", "x").await.unwrap();
    assert_eq!(found.role_id, admin.role_id);
    assert_eq!(store.list_roles().await.unwrap().len(), 2);
}

#[sqlx::test(migrations = false)]
async fn test_update_and_delete_role(pool: PgPool) {
    let store = store(pool).await;
    let created = store.insert_role(&role("Customer", "c")).await.unwrap();

    let renamed = Role {
        name: "Client".into(),
        ..created.clone()
    };
    let updated = store.update_role(&renamed).await.unwrap();
    assert_eq!(updated.name, "Client");

    store.delete_role(&created.role_id).await.unwrap();
    assert_matches!(
        store.find_role_by_id(&created.role_id).await,
        Err(StoreError::NotFound)
    );
    assert_matches!(store.update_role(&renamed).await, Err(StoreError::NotFound));
}

// ---------------------------------------------------------------------------
// Assignments
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = false)]
async fn test_assignment_queries(pool: PgPool) {
    let store = store(pool).await;
    let alice = store.insert_user(&user("alice")).await.unwrap();
    let bob = store.insert_user(&user("bob")).await.unwrap();
    let admin = store.insert_role(&role("Admin", "x")).await.unwrap();
    let admin_alt = store.insert_role(&role("Admin", "y")).await.unwrap();

    store.insert_user_role(&assignment(&alice, &admin)).await.unwrap();
    store
        .insert_user_role(&assignment(&alice, &admin_alt))
        .await
        .unwrap();

    // Two roles named Admin, but alice appears once.
    let admins = store.list_users_with_role("Admin").await.unwrap();
    assert_eq!(admins.len(), 1);
    assert_eq!(admins[0].user_id, alice.user_id);

    assert_eq!(store.list_roles_for_user(&alice.user_id).await.unwrap().len(), 2);
    assert!(store.list_roles_for_user(&bob.user_id).await.unwrap().is_empty());
}

#[sqlx::test(migrations = false)]
async fn test_assignment_constraints(pool: PgPool) {
    let store = store(pool).await;
    let u = store.insert_user(&user("carol")).await.unwrap();
    let r = store.insert_role(&role("Admin", "")).await.unwrap();
    let pair = assignment(&u, &r);

    store.insert_user_role(&pair).await.unwrap();
    assert_matches!(
        store.insert_user_role(&pair).await,
        Err(StoreError::UniqueViolation { .. })
    );

    let dangling = UserRole {
        user_id: "ghost".into(),
        role_id: r.role_id.clone(),
    };
    assert_matches!(
        store.insert_user_role(&dangling).await,
        Err(StoreError::ForeignKeyViolation { .. })
    );

    store.delete_user_role(&pair).await.unwrap();
    assert_matches!(store.delete_user_role(&pair).await, Err(StoreError::NotFound));
}

#[sqlx::test(migrations = false)]
async fn test_user_delete_cascades_and_role_delete_restricts(pool: PgPool) {
    let store = store(pool.clone()).await;
    let u = store.insert_user(&user("dave")).await.unwrap();
    let r = store.insert_role(&role("Admin", "")).await.unwrap();
    store.insert_user_role(&assignment(&u, &r)).await.unwrap();

    assert_matches!(
        store.delete_role(&r.role_id).await,
        Err(StoreError::ForeignKeyViolation { .. })
    );

    store.delete_user(&u.user_id).await.unwrap();
    let remaining: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM test_user_roles")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(remaining.0, 0);

    store.delete_role(&r.role_id).await.unwrap();
}

// ---------------------------------------------------------------------------
// Access service over Postgres
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = false)]
async fn test_service_signup_login_and_roles(pool: PgPool) {
    let store = store(pool).await;
    let service = AccessService::new(
        Arc::new(store),
        TokenIssuer::new(&SigningSecret::new("integration-secret")),
    );

    let created = service
        .create_user(NewUser {
            username: "erin".into(),
            email: "erin@example.com".into(),
            password: "erin-password-123".into(),
            fullname: "Erin".into(),
            phone_number: None,
            avatar: None,
            address: None,
        })
        .await
        .unwrap();

    let token = service
        .login("erin@example.com", "erin-password-123")
        .await
        .unwrap();
    assert_eq!(service.authenticate(&token).unwrap().sub, created.user_id);
    assert_matches!(
        service.login("erin@example.com", "not-the-password").await,
        Err(CoreError::AuthenticationFailed)
    );

    let first = service
        .create_role(NewRole {
            name: "Admin".into(),
            description: "x".into(),
        })
        .await
        .unwrap();
    let again = service
        .create_role(NewRole {
            name: "Admin".into(),
            description: "x".into(),
        })
        .await
        .unwrap();
    assert_eq!(first.role_id, again.role_id);

    let pair = UserRole {
        user_id: created.user_id.clone(),
        role_id: first.role_id.clone(),
    };
    service.add_user_role(pair.clone()).await.unwrap();
    assert_matches!(
        service.add_user_role(pair).await,
        Err(CoreError::ConstraintViolation(_))
    );
    assert_matches!(
        service.delete_role(&first.role_id).await,
        Err(CoreError::ConstraintViolation(_))
    );
}
