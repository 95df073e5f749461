//! Account principals and the in-memory directory backing the demo server.
use std::collections::HashMap;

use async_trait::async_trait;
use serde::Serialize;

use crate::security::{LoaderError, Principal, PrincipalLoader};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountUser {
    pub id: u64,
    pub name: String,
    pub email: Option<String>,
}

impl AccountUser {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

impl Principal for AccountUser {
    type Id = u64;

    fn id(&self) -> &u64 {
        &self.id
    }
}

/// Read-only account lookup keyed by numeric id (the token `sub`).
#[derive(Debug, Clone, Default)]
pub struct AccountDirectory {
    accounts: HashMap<u64, AccountUser>,
}

impl AccountDirectory {
    pub fn new(accounts: impl IntoIterator<Item = AccountUser>) -> Self {
        Self {
            accounts: accounts.into_iter().map(|a| (a.id, a)).collect(),
        }
    }

    /// Accounts available out of the box on a development server.
    pub fn with_demo_accounts() -> Self {
        Self::new([
            AccountUser::new(42, "alice").with_email("alice@example.com"),
            AccountUser::new(7, "bob"),
        ])
    }

    pub fn get(&self, id: u64) -> Option<&AccountUser> {
        self.accounts.get(&id)
    }
}

#[async_trait]
impl PrincipalLoader<AccountUser> for AccountDirectory {
    async fn load(&self, subject: &str) -> Result<Option<AccountUser>, LoaderError> {
        // Non-numeric subjects cannot name an account
        let Ok(id) = subject.parse::<u64>() else {
            return Ok(None);
        };
        Ok(self.get(id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn loads_by_numeric_subject() {
        let directory = AccountDirectory::with_demo_accounts();

        let alice = directory.load("42").await.unwrap().unwrap();
        assert_eq!(alice.name, "alice");
        assert_eq!(*alice.id(), 42);

        assert!(directory.load("1000").await.unwrap().is_none());
        assert!(directory.load("alice").await.unwrap().is_none());
    }
}
