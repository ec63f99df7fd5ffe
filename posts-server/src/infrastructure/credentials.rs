use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
        rand_core::OsRng,
    },
};
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum CredentialsError {
    #[error("invalid credentials")]
    Invalid,

    #[error("password hashing failed: {0}")]
    Hashing(String),
}

/// The single account allowed to call the API. Only an argon2id hash of the
/// password is kept in memory.
pub(crate) struct Credentials {
    username: String,
    password_hash: String,
    params: Params,
}

impl Credentials {
    pub(crate) fn new(username: &str, raw_password: &str) -> Result<Self, CredentialsError> {
        let params = Params::new(19 * 1024, 2, 1, None)
            .map_err(|err| CredentialsError::Hashing(err.to_string()))?;
        Self::with_params(username, raw_password, params)
    }

    pub(crate) fn with_params(
        username: &str,
        raw_password: &str,
        params: Params,
    ) -> Result<Self, CredentialsError> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = argon2(params.clone())
            .hash_password(raw_password.as_bytes(), &salt)
            .map_err(|err| CredentialsError::Hashing(err.to_string()))?
            .to_string();

        Ok(Self {
            username: username.to_string(),
            password_hash,
            params,
        })
    }

    /// The password is always checked, even when the username is wrong.
    pub(crate) fn verify(
        &self,
        username: &str,
        raw_password: &str,
    ) -> Result<(), CredentialsError> {
        let parsed_hash = PasswordHash::new(&self.password_hash)
            .map_err(|err| CredentialsError::Hashing(err.to_string()))?;
        let password_ok = match argon2(self.params.clone())
            .verify_password(raw_password.as_bytes(), &parsed_hash)
        {
            Ok(()) => true,
            Err(PasswordHashError::Password) => false,
            Err(err) => return Err(CredentialsError::Hashing(err.to_string())),
        };

        if password_ok && username == self.username {
            Ok(())
        } else {
            Err(CredentialsError::Invalid)
        }
    }
}

fn argon2(params: Params) -> Argon2<'static> {
    Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
}

#[cfg(test)]
pub(crate) fn test_params() -> Params {
    Params::new(8, 1, 1, None).expect("minimal argon2 params must be valid")
}

#[cfg(test)]
mod tests {
    use super::{Credentials, CredentialsError, test_params};

    fn credentials() -> Credentials {
        Credentials::with_params("admin", "correct-password", test_params())
            .expect("hash must be created")
    }

    #[test]
    fn verify_accepts_configured_account() {
        assert!(credentials().verify("admin", "correct-password").is_ok());
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let err = credentials()
            .verify("admin", "wrong-password")
            .expect_err("must be rejected");
        assert!(matches!(err, CredentialsError::Invalid));
    }

    #[test]
    fn verify_rejects_unknown_user_with_correct_password() {
        let err = credentials()
            .verify("intruder", "correct-password")
            .expect_err("must be rejected");
        assert!(matches!(err, CredentialsError::Invalid));
    }

    #[test]
    fn hash_is_not_the_raw_password() {
        let creds = credentials();
        assert!(creds.password_hash.starts_with("$argon2id$"));
        assert!(!creds.password_hash.contains("correct-password"));
    }
}
