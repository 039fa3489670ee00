use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::modules::friendship::schema::{FriendshipEntity, FriendshipStatus};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendshipResponse {
    pub id: Uuid,
    pub requester_id: Uuid,
    pub receiver_id: Uuid,
    pub status: FriendshipStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<FriendshipEntity> for FriendshipResponse {
    fn from(entity: FriendshipEntity) -> Self {
        FriendshipResponse {
            id: entity.id,
            requester_id: entity.requester_id,
            receiver_id: entity.receiver_id,
            status: entity.status,
            created_at: entity.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequestBody {
    pub requester_id: Uuid,
    pub receiver_id: Uuid,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ActingUserQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CheckFriendshipQuery {
    pub user_id1: Uuid,
    pub user_id2: Uuid,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CheckPendingQuery {
    pub requester_id: Uuid,
    pub receiver_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreFriendsResponse {
    pub are_friends: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HasPendingRequestResponse {
    pub has_pending_request: bool,
}
