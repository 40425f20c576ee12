use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use super::password::PasswordHasher;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row of the credential table, keyed by username.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    pub username: String,
    pub role: Role,
    #[serde(default)]
    pub disabled: bool,
    pub password_hash: String,
}

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Failed to read users file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse users file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Duplicate username in credential table: {0}")]
    DuplicateUsername(String),

    #[error(transparent)]
    Hashing(#[from] super::AuthError),
}

/// Read-only lookup of credentials by username.
pub trait CredentialStore: Send + Sync {
    fn lookup(&self, username: &str) -> Option<Credential>;
}

/// Credential table held in memory, populated once at startup.
#[derive(Debug, Default, Clone)]
pub struct MemoryCredentialStore {
    users: HashMap<String, Credential>,
}

impl MemoryCredentialStore {
    pub fn new(credentials: Vec<Credential>) -> Result<Self, CredentialError> {
        let mut users = HashMap::with_capacity(credentials.len());
        for credential in credentials {
            if users.contains_key(&credential.username) {
                return Err(CredentialError::DuplicateUsername(credential.username));
            }
            users.insert(credential.username.clone(), credential);
        }
        Ok(Self { users })
    }

    /// Load the credential table from a YAML list of credentials.
    pub fn from_yaml_file(path: &Path) -> Result<Self, CredentialError> {
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| CredentialError::Io {
            path: display.clone(),
            source,
        })?;
        Self::from_yaml_str(&raw).map_err(|e| match e {
            CredentialError::Parse { source, .. } => CredentialError::Parse { path: display, source },
            other => other,
        })
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self, CredentialError> {
        let credentials: Vec<Credential> = serde_yaml::from_str(raw).map_err(|source| CredentialError::Parse {
            path: "<inline>".to_string(),
            source,
        })?;
        Self::new(credentials)
    }

    /// Single `admin` account with password `secret`, for local development only.
    pub fn development(hasher: &PasswordHasher) -> Result<Self, CredentialError> {
        let admin = Credential {
            username: "admin".to_string(),
            role: Role::Admin,
            disabled: false,
            password_hash: hasher.hash("secret")?,
        };
        Self::new(vec![admin])
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn lookup(&self, username: &str) -> Option<Credential> {
        self.users.get(username).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const USERS_YAML: &str = r#"
- username: admin
  role: admin
  password_hash: "$2b$04$abcdefghijklmnopqrstuu5Wf6U8e1QKpcQ9/Yuh6s2mI8vJ0l1Ke"
- username: viewer
  role: user
  disabled: true
  password_hash: "$2b$04$abcdefghijklmnopqrstuu5Wf6U8e1QKpcQ9/Yuh6s2mI8vJ0l1Ke"
"#;

    #[test]
    fn parses_yaml_table() {
        let store = MemoryCredentialStore::from_yaml_str(USERS_YAML).unwrap();
        assert_eq!(store.len(), 2);

        let admin = store.lookup("admin").unwrap();
        assert_eq!(admin.role, Role::Admin);
        assert!(!admin.disabled);

        let viewer = store.lookup("viewer").unwrap();
        assert_eq!(viewer.role, Role::User);
        assert!(viewer.disabled);

        assert!(store.lookup("nobody").is_none());
    }

    #[test]
    fn rejects_unknown_role() {
        let raw = "- username: x\n  role: root\n  password_hash: h\n";
        assert!(matches!(
            MemoryCredentialStore::from_yaml_str(raw),
            Err(CredentialError::Parse { .. })
        ));
    }

    #[test]
    fn rejects_duplicate_usernames() {
        let cred = Credential {
            username: "admin".to_string(),
            role: Role::Admin,
            disabled: false,
            password_hash: String::new(),
        };
        let err = MemoryCredentialStore::new(vec![cred.clone(), cred]).unwrap_err();
        assert!(matches!(err, CredentialError::DuplicateUsername(name) if name == "admin"));
    }

    #[test]
    fn development_table_verifies_default_password() {
        let hasher = PasswordHasher::new(4);
        let store = MemoryCredentialStore::development(&hasher).unwrap();
        let admin = store.lookup("admin").unwrap();
        assert!(hasher.verify("secret", &admin.password_hash));
    }
}
