//! users: back-office administrators.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::schema::users;

#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = users)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub password_hash: String,
}

impl NewUser {
    pub fn new(email: impl Into<String>, name: impl Into<String>, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            name: name.into(),
            password_hash,
        }
    }

    pub fn into_user(self, now: DateTime<Utc>) -> User {
        User {
            id: self.id,
            email: self.email,
            name: self.name,
            password_hash: self.password_hash,
            created_at: now,
        }
    }
}
