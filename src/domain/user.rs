/// Avatar filename every new account starts with.
pub const DEFAULT_AVATAR: &str = "default.png";

pub const MAX_USERNAME_LEN: usize = 25;
pub const MAX_EMAIL_LEN: usize = 50;
pub const MAX_FULLNAME_LEN: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    /// Argon2 hash string, never the plaintext.
    pub password: String,
    pub fullname: Option<String>,
    /// Filename under the static image area.
    pub avatar: String,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    /// Already hashed by the account service.
    pub password: String,
}

#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub fullname: Option<String>,
    /// `None` keeps the current avatar.
    pub avatar: Option<String>,
}
