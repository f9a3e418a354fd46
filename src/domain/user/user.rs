use serde::Serialize;
use std::collections::BTreeSet;
use uuid::Uuid;

use super::value_objects::Authority;

/// A user account with the group memberships and authorities used
/// for role checks
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub login: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub groups: BTreeSet<String>,
    pub authorities: BTreeSet<Authority>,
}

impl User {
    /// Full display name, "First Last"
    pub fn name(&self) -> String {
        match (self.first_name.is_empty(), self.last_name.is_empty()) {
            (false, false) => format!("{} {}", self.first_name, self.last_name),
            (false, true) => self.first_name.clone(),
            (true, false) => self.last_name.clone(),
            (true, true) => String::new(),
        }
    }

    pub fn has_authority(&self, authority: Authority) -> bool {
        self.authorities.contains(&authority)
    }

    pub fn is_admin(&self) -> bool {
        self.has_authority(Authority::Admin)
    }

    pub fn is_member_of(&self, group: &str) -> bool {
        self.groups.contains(group)
    }
}

/// Summary of a user returned by the team formation search
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamSearchUser {
    pub id: Uuid,
    pub login: String,
    pub name: String,
    pub email: Option<String>,
    /// Team of the exercise this student already belongs to, if any
    pub assigned_team_id: Option<Uuid>,
}

impl TeamSearchUser {
    pub fn new(user: &User, assigned_team_id: Option<Uuid>) -> Self {
        Self {
            id: user.id,
            login: user.login.clone(),
            name: user.name(),
            email: user.email.clone(),
            assigned_team_id,
        }
    }
}
