use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::{self, SaltString, rand_core::OsRng},
};
use uuid::Uuid;

use reelgate_db::models::UserRow;
use reelgate_db::{Database, DbError};

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("username already exists")]
    DuplicateUsername,

    #[error("user not found")]
    NotFound,

    #[error("password mismatch")]
    Mismatch,

    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error("stored user id is not a uuid: {0}")]
    CorruptId(String),

    #[error(transparent)]
    Db(DbError),
}

impl From<DbError> for CredentialError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::DuplicateUsername => CredentialError::DuplicateUsername,
            other => CredentialError::Db(other),
        }
    }
}

impl From<password_hash::Error> for CredentialError {
    fn from(err: password_hash::Error) -> Self {
        CredentialError::Hash(err.to_string())
    }
}

/// Username/password-hash pairs backed by the `users` table.
///
/// Passwords are hashed with Argon2id and a fresh random salt. All methods
/// block (hashing is deliberately slow), so async callers run them on the
/// blocking pool.
pub struct CredentialStore {
    db: Database,
    argon2: Argon2<'static>,
}

impl CredentialStore {
    pub fn new(db: Database, params: Params) -> Self {
        Self {
            db,
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Hash `password` and persist a new user. Returns the new user's id.
    pub fn register(&self, username: &str, password: &str) -> Result<Uuid, CredentialError> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)?
            .to_string();

        let user_id = Uuid::new_v4();
        self.db
            .create_user(&user_id.to_string(), username, &password_hash)?;

        Ok(user_id)
    }

    /// Look up `username` and check `password` against its stored hash.
    pub fn verify(&self, username: &str, password: &str) -> Result<VerifiedUser, CredentialError> {
        let user = self
            .db
            .get_user_by_username(username)?
            .ok_or(CredentialError::NotFound)?;

        let parsed_hash = PasswordHash::new(&user.password)?;

        match self.argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => VerifiedUser::try_from(user),
            Err(password_hash::Error::Password) => Err(CredentialError::Mismatch),
            Err(e) => Err(e.into()),
        }
    }
}

/// A user whose password has just been checked.
#[derive(Debug, Clone)]
pub struct VerifiedUser {
    pub id: Uuid,
    pub username: String,
}

impl TryFrom<UserRow> for VerifiedUser {
    type Error = CredentialError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let id = row
            .id
            .parse()
            .map_err(|_| CredentialError::CorruptId(row.id.clone()))?;
        Ok(Self {
            id,
            username: row.username,
        })
    }
}
