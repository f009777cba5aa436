//! contact_queries: leads from the contact form and the download gate.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::contact_queries;

/// Status given to every freshly submitted query.
pub const STATUS_NEW: &str = "new";

/// Statuses an admin may move a query between.
pub const STATUSES: [&str; 3] = [STATUS_NEW, "contacted", "closed"];

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = contact_queries)]
#[serde(rename_all = "camelCase")]
pub struct ContactQuery {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub subject: String,
    pub message: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = contact_queries)]
pub struct NewContactQuery {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub subject: String,
    pub message: String,
    pub status: String,
}

impl NewContactQuery {
    pub fn into_query(self, now: DateTime<Utc>) -> ContactQuery {
        ContactQuery {
            id: self.id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone_number: self.phone_number,
            subject: self.subject,
            message: self.message,
            status: self.status,
            created_at: now,
        }
    }
}
