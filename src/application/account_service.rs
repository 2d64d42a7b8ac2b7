use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use async_trait::async_trait;

use crate::domain::error::{Error, Result};
use crate::domain::repository::UserRepository;
use crate::domain::user::{
    MAX_EMAIL_LEN, MAX_FULLNAME_LEN, MAX_USERNAME_LEN, NewUser, ProfileUpdate, User, UserId,
};

#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[async_trait]
pub trait AccountService: Send + Sync + 'static {
    async fn register(&self, input: Registration) -> Result<User>;
    /// Generic `AuthFailure` for unknown user and wrong password alike.
    async fn authenticate(&self, username: &str, password: &str) -> Result<User>;
    async fn user(&self, id: UserId) -> Result<Option<User>>;
    /// Fullname is always replaced; the avatar only when one was ingested.
    async fn update_profile(
        &self,
        id: UserId,
        fullname: Option<String>,
        avatar: Option<String>,
    ) -> Result<()>;
}

#[derive(Clone)]
pub struct AccountServiceImpl<R: UserRepository> {
    repo: R,
}

impl<R: UserRepository> AccountServiceImpl<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl<R: UserRepository> AccountService for AccountServiceImpl<R> {
    async fn register(&self, input: Registration) -> Result<User> {
        let username = input.username.trim();
        if username.is_empty() || username.len() > MAX_USERNAME_LEN {
            return Err(Error::Validation(format!(
                "username must be 1-{MAX_USERNAME_LEN} characters"
            )));
        }
        let email = input.email.trim();
        if email.is_empty() || email.len() > MAX_EMAIL_LEN || !email.contains('@') {
            return Err(Error::Validation("a valid email address is required".into()));
        }
        if input.password.is_empty() {
            return Err(Error::Validation("password must not be empty".into()));
        }

        let password = hash_password(&input.password)?;
        self.repo
            .create(NewUser { username: username.to_string(), email: email.to_string(), password })
            .await
    }

    async fn authenticate(&self, username: &str, password: &str) -> Result<User> {
        let Some(user) = self.repo.find_by_username(username.trim()).await? else {
            return Err(Error::AuthFailure);
        };
        if verify_password(password, &user.password) {
            Ok(user)
        } else {
            Err(Error::AuthFailure)
        }
    }

    async fn user(&self, id: UserId) -> Result<Option<User>> {
        self.repo.find_by_id(id).await
    }

    async fn update_profile(
        &self,
        id: UserId,
        fullname: Option<String>,
        avatar: Option<String>,
    ) -> Result<()> {
        let fullname = fullname
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty());
        if let Some(f) = &fullname {
            if f.len() > MAX_FULLNAME_LEN {
                return Err(Error::Validation(format!(
                    "name must be at most {MAX_FULLNAME_LEN} characters"
                )));
            }
        }
        self.repo.update_profile(id, ProfileUpdate { fullname, avatar }).await
    }
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| Error::Credential)
}

/// Constant-time verification; malformed stored hashes count as a mismatch.
fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok()
}
