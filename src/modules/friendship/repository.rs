use uuid::Uuid;

use crate::api::error;
use crate::modules::friendship::schema::{FriendshipEntity, FriendshipStatus};

/// Durable store for friendship records.
///
/// Lists come back in creation order. Implementations must reject a second
/// record for the same unordered pair of users with `SystemError::Conflict`.
#[async_trait::async_trait]
pub trait FriendshipRepository: Send + Sync {
    async fn insert(
        &self,
        requester_id: &Uuid,
        receiver_id: &Uuid,
    ) -> Result<FriendshipEntity, error::SystemError>;

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<FriendshipEntity>, error::SystemError>;

    async fn find_by_either_participant(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendshipEntity>, error::SystemError>;

    async fn find_by_receiver_and_status(
        &self,
        receiver_id: &Uuid,
        status: FriendshipStatus,
    ) -> Result<Vec<FriendshipEntity>, error::SystemError>;

    async fn find_by_direction_and_status(
        &self,
        requester_id: &Uuid,
        receiver_id: &Uuid,
        status: FriendshipStatus,
    ) -> Result<Option<FriendshipEntity>, error::SystemError>;

    async fn find_friend_ids(&self, user_id: &Uuid) -> Result<Vec<Uuid>, error::SystemError>;

    /// Sets `status = next` only while the stored status is still `expected`.
    /// `None` means the record is gone or another writer got there first.
    async fn update_status(
        &self,
        id: &Uuid,
        expected: FriendshipStatus,
        next: FriendshipStatus,
    ) -> Result<Option<FriendshipEntity>, error::SystemError>;

    async fn delete(&self, id: &Uuid) -> Result<bool, error::SystemError>;
}
