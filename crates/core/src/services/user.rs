//! User account service.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use beanbook_common::{AppError, AppResult, IdGenerator};
use beanbook_db::{entities::user, repositories::UserRepository};
use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Input for registering a new user.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterInput {
    #[validate(length(min = 1, max = 256))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

/// Input for updating profile fields. Absent fields keep stored values.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileInput {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub contact: Option<String>,
}

/// User service for business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(user_repo: UserRepository) -> Self {
        Self {
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Register a new user.
    pub async fn register(&self, input: RegisterInput) -> AppResult<user::Model> {
        input.validate()?;

        if self.user_repo.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::Conflict("User already exists.".to_string()));
        }

        let password_hash = hash_password(&input.password)?;

        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(input.name),
            email: Set(input.email),
            password_hash: Set(password_hash),
            avatar_url: Set(None),
            bio: Set(None),
            location: Set(None),
            contact: Set(None),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        self.user_repo.create(model).await
    }

    /// Authenticate by email and password.
    ///
    /// An unknown email and a wrong password are indistinguishable to the
    /// caller.
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<user::Model> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AppError::Unauthorized);
        }

        Ok(user)
    }

    /// Fetch a user by ID, failing if absent.
    pub async fn get_user(&self, user_id: &str) -> AppResult<user::Model> {
        self.user_repo.get_by_id(user_id).await
    }

    /// Update profile fields.
    pub async fn update_profile(
        &self,
        user_id: &str,
        input: UpdateProfileInput,
    ) -> AppResult<user::Model> {
        let user = self.user_repo.get_by_id(user_id).await?;

        let mut active: user::ActiveModel = user.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(bio) = input.bio {
            active.bio = Set(Some(bio));
        }
        if let Some(location) = input.location {
            active.location = Set(Some(location));
        }
        if let Some(contact) = input.contact {
            active.contact = Set(Some(contact));
        }
        active.updated_at = Set(Some(Utc::now().into()));

        self.user_repo.update(active).await
    }

    /// Set the profile picture URL (a blob-store reference).
    pub async fn set_avatar(&self, user_id: &str, url: &str) -> AppResult<user::Model> {
        let user = self.user_repo.get_by_id(user_id).await?;

        let mut active: user::ActiveModel = user.into();
        active.avatar_url = Set(Some(url.to_string()));
        active.updated_at = Set(Some(Utc::now().into()));

        self.user_repo.update(active).await
    }
}

/// Hash a password with Argon2.
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against an Argon2 hash.
fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_user(id: &str, email: &str, password_hash: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            name: "Test User".to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            avatar_url: None,
            bio: None,
            location: None,
            contact: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[test]
    fn test_hash_password() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(hash.starts_with("$argon2"));
    }

    #[test]
    fn test_verify_password_correct() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(verify_password("correct horse battery", &hash).unwrap());
    }

    #[test]
    fn test_verify_password_incorrect() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(!verify_password("wrong", &hash).unwrap());
    }

    #[test]
    fn test_hash_password_salted_differently_each_time() {
        let hash1 = hash_password("same input").unwrap();
        let hash2 = hash_password("same input").unwrap();

        assert_ne!(hash1, hash2);
        assert!(verify_password("same input", &hash1).unwrap());
        assert!(verify_password("same input", &hash2).unwrap());
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_email() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = UserService::new(UserRepository::new(db));

        let input = RegisterInput {
            name: "Mina".to_string(),
            email: "not-an-email".to_string(),
            password: "long enough".to_string(),
        };
        let result = service.register(input).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_register_taken_email_returns_conflict() {
        let existing = create_test_user("u1", "mina@example.com", "$argon2id$x");
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[existing]])
                .into_connection(),
        );
        let service = UserService::new(UserRepository::new(db));

        let input = RegisterInput {
            name: "Mina".to_string(),
            email: "mina@example.com".to_string(),
            password: "long enough".to_string(),
        };
        let result = service.register(input).await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_authenticate_unknown_email_is_unauthorized() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );
        let service = UserService::new(UserRepository::new(db));

        let result = service.authenticate("ghost@example.com", "whatever").await;

        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_authenticate_wrong_password_is_unauthorized() {
        let hash = hash_password("right password").unwrap();
        let existing = create_test_user("u1", "mina@example.com", &hash);
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[existing]])
                .into_connection(),
        );
        let service = UserService::new(UserRepository::new(db));

        let result = service.authenticate("mina@example.com", "wrong password").await;

        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_authenticate_success_returns_user() {
        let hash = hash_password("right password").unwrap();
        let existing = create_test_user("u1", "mina@example.com", &hash);
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[existing]])
                .into_connection(),
        );
        let service = UserService::new(UserRepository::new(db));

        let user = service
            .authenticate("mina@example.com", "right password")
            .await
            .unwrap();

        assert_eq!(user.id, "u1");
    }
}
