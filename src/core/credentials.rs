use anyhow::Result;
use std::fmt;

pub const USERNAME_VAR: &str = "FDN_USERNAME";
pub const PASSWORD_VAR: &str = "FDN_PASSWORD";

/// Login pair for the delivery service, read once at startup.
#[derive(Clone)]
pub struct Credentials {
    identifier: String,
    secret: String,
}

impl Credentials {
    pub fn new(identifier: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            secret: secret.into(),
        }
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        match (lookup(USERNAME_VAR), lookup(PASSWORD_VAR)) {
            (Some(identifier), Some(secret)) if !identifier.is_empty() && !secret.is_empty() => {
                Ok(Self::new(identifier, secret))
            }
            _ => anyhow::bail!(
                "Username or password not found in env: set {} and {}",
                USERNAME_VAR,
                PASSWORD_VAR
            ),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identifier", &self.identifier)
            .field("secret", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_reads_both_variables() {
        let creds = Credentials::from_lookup(|key| match key {
            USERNAME_VAR => Some("+375291234567".to_string()),
            PASSWORD_VAR => Some("hunter2".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(creds.identifier(), "+375291234567");
        assert_eq!(creds.secret(), "hunter2");
    }

    #[test]
    fn test_missing_or_empty_variables_fail() {
        assert!(Credentials::from_lookup(|_| None).is_err());
        assert!(Credentials::from_lookup(|key| match key {
            USERNAME_VAR => Some("user".to_string()),
            _ => None,
        })
        .is_err());
        assert!(Credentials::from_lookup(|_| Some(String::new())).is_err());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let creds = Credentials::new("user", "hunter2");
        let debug = format!("{creds:?}");
        assert!(debug.contains("user"));
        assert!(!debug.contains("hunter2"));
    }
}
