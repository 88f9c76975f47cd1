// Copyright (c) Handball Connect Team
// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::accounts;

/// A registered identity plus profile metadata.
///
/// `is_admin` is the single canonical role flag; no alias field exists
/// anywhere in the system.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Insertable, Serialize, Deserialize)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Account {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub profile_image: Option<String>,
    pub position: Option<String>,
    pub experience: Option<String>,
    pub is_admin: bool,
    pub is_disabled: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Partial profile update; only supplied fields are written.
#[derive(Debug, Clone, Default, AsChangeset, Deserialize)]
#[diesel(table_name = accounts)]
pub struct ProfileUpdate {
    pub username: Option<String>,
    pub position: Option<String>,
    pub experience: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.position.is_none() && self.experience.is_none()
    }
}
