use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Post {
    pub id: u64,
    pub title: String,
    pub content: String,
}

/// Body of create/update requests and of `[[seed_posts]]` config entries.
/// A client-supplied `id` is ignored.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PostInput {
    pub title: String,
    pub content: String,
}

impl PostInput {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

/// Account record. The password is kept exactly as submitted.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct User {
    pub email: String,
    pub password: String,
}

impl User {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn matches(&self, email: &str, password: &str) -> bool {
        self.email == email && self.password == password
    }
}
