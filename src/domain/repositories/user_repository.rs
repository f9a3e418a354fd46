use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::user::{LoginOrName, User};
use crate::domain::DomainResult;

/// Repository trait for users, with their groups and authorities
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by ID
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<User>>;

    /// Find every user among `ids`; unknown ids are skipped
    async fn find_all_by_ids(&self, ids: &[Uuid]) -> DomainResult<Vec<User>>;

    /// Members of `group` whose login or name contains the query, ordered by login
    async fn search_by_login_or_name_in_group(
        &self,
        group: &str,
        query: &LoginOrName,
    ) -> DomainResult<Vec<User>>;
}
