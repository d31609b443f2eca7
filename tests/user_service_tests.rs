use launchpad::{
    repositories::user_repository::SqliteUserRepository,
    services::user_service::{CreateUserRequest, UserService, UserServiceError},
    test_utils::test_helpers,
};
use std::sync::Arc;

fn request(name: Option<&str>, email: &str, password: &str) -> CreateUserRequest {
    CreateUserRequest {
        name: name.map(str::to_string),
        email: email.to_string(),
        password: password.to_string(),
    }
}

#[tokio::test]
async fn test_create_user_success() {
    // Create isolated test database
    let pool = test_helpers::create_test_db().await.unwrap();
    let repository = Arc::new(SqliteUserRepository::new(pool.clone()));
    let service = UserService::new(repository);

    let user = service
        .create_user(request(Some("Ann"), "ann@x.com", "pw1"))
        .await
        .unwrap();

    assert!(user.id > 0);
    assert_eq!(user.name.as_deref(), Some("Ann"));
    assert_eq!(user.email, "ann@x.com");
    assert_eq!(test_helpers::count_users(&pool).await.unwrap(), 1);
}

#[tokio::test]
async fn test_create_user_stores_hash_not_password() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let repository = Arc::new(SqliteUserRepository::new(pool.clone()));
    let service = UserService::new(repository);

    service
        .create_user(request(None, "hash@example.com", "plaintext-secret"))
        .await
        .unwrap();

    let stored = service
        .find_user_by_email("hash@example.com")
        .await
        .unwrap()
        .unwrap();

    assert_ne!(stored.password_hash, "plaintext-secret");
    assert!(stored.password_hash.starts_with("$argon2id$"));
    assert!(launchpad::services::password::verify_password(
        "plaintext-secret",
        &stored.password_hash
    ));
}

#[tokio::test]
async fn test_create_user_duplicate_email() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let repository = Arc::new(SqliteUserRepository::new(pool.clone()));
    let service = UserService::new(repository);

    service
        .create_user(request(None, "duplicate@example.com", "password123"))
        .await
        .unwrap();

    let result = service
        .create_user(request(Some("Other"), "duplicate@example.com", "password456"))
        .await;

    assert!(matches!(result.unwrap_err(), UserServiceError::EmailTaken));
    assert_eq!(test_helpers::count_users(&pool).await.unwrap(), 1);
}

#[tokio::test]
async fn test_create_user_missing_credentials() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let repository = Arc::new(SqliteUserRepository::new(pool.clone()));
    let service = UserService::new(repository);

    let no_email = service.create_user(request(None, "", "pw")).await;
    assert!(matches!(
        no_email.unwrap_err(),
        UserServiceError::MissingCredentials
    ));

    let blank_email = service.create_user(request(None, "   ", "pw")).await;
    assert!(matches!(
        blank_email.unwrap_err(),
        UserServiceError::MissingCredentials
    ));

    let no_password = service.create_user(request(None, "a@b.com", "")).await;
    assert!(matches!(
        no_password.unwrap_err(),
        UserServiceError::MissingCredentials
    ));

    assert_eq!(test_helpers::count_users(&pool).await.unwrap(), 0);
}

#[tokio::test]
async fn test_empty_name_is_stored_as_absent() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let repository = Arc::new(SqliteUserRepository::new(pool));
    let service = UserService::new(repository);

    let user = service
        .create_user(request(Some(""), "noname@example.com", "pw"))
        .await
        .unwrap();

    assert_eq!(user.name, None);
    assert_eq!(user.display_name(), "(No Name)");
}

#[tokio::test]
async fn test_list_users_newest_first() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let repository = Arc::new(SqliteUserRepository::new(pool));
    let service = UserService::new(repository);

    for email in ["first@example.com", "second@example.com", "third@example.com"] {
        service.create_user(request(None, email, "pw")).await.unwrap();
    }

    let users = service.list_users().await.unwrap();
    let emails: Vec<&str> = users.iter().map(|u| u.email.as_str()).collect();

    assert_eq!(
        emails,
        vec!["third@example.com", "second@example.com", "first@example.com"]
    );
}

#[tokio::test]
async fn test_list_users_empty() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let repository = Arc::new(SqliteUserRepository::new(pool));
    let service = UserService::new(repository);

    assert!(service.list_users().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_find_user_by_id() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let repository = Arc::new(SqliteUserRepository::new(pool));
    let service = UserService::new(repository);

    let created = service
        .create_user(request(Some("Bo"), "bo@example.com", "pw"))
        .await
        .unwrap();

    let found = service.find_user_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(found.email, "bo@example.com");

    assert!(service.find_user_by_id(9999).await.unwrap().is_none());
}
