use serde::{Deserialize, Serialize};
use sqlx::prelude::{FromRow, Type};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(type_name = "friendship_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "lowercase")]
pub enum FriendshipStatus {
    Pending,
    Accepted,
    Declined,
}

impl FriendshipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FriendshipStatus::Pending => "pending",
            FriendshipStatus::Accepted => "accepted",
            FriendshipStatus::Declined => "declined",
        }
    }

    /// Only `Pending` may move, and only into one of the two terminal states.
    pub fn can_transition_to(&self, next: FriendshipStatus) -> bool {
        matches!(
            (self, next),
            (FriendshipStatus::Pending, FriendshipStatus::Accepted)
                | (FriendshipStatus::Pending, FriendshipStatus::Declined)
        )
    }
}

impl std::fmt::Display for FriendshipStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct FriendshipEntity {
    pub id: Uuid,
    pub requester_id: Uuid,
    pub receiver_id: Uuid,
    pub status: FriendshipStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl FriendshipEntity {
    pub fn is_pending(&self) -> bool {
        self.status == FriendshipStatus::Pending
    }

    pub fn is_accepted(&self) -> bool {
        self.status == FriendshipStatus::Accepted
    }

    pub fn is_declined(&self) -> bool {
        self.status == FriendshipStatus::Declined
    }

    pub fn involves_user(&self, user_id: &Uuid) -> bool {
        self.requester_id == *user_id || self.receiver_id == *user_id
    }

    /// The participant on the other side of `user_id`, if `user_id` is a participant at all.
    pub fn other_user(&self, user_id: &Uuid) -> Option<Uuid> {
        if self.requester_id == *user_id {
            Some(self.receiver_id)
        } else if self.receiver_id == *user_id {
            Some(self.requester_id)
        } else {
            None
        }
    }

    pub fn pair(&self) -> (Uuid, Uuid) {
        normalized_pair(&self.requester_id, &self.receiver_id)
    }
}

pub fn normalized_pair(user_id_a: &Uuid, user_id_b: &Uuid) -> (Uuid, Uuid) {
    if user_id_a <= user_id_b { (*user_id_a, *user_id_b) } else { (*user_id_b, *user_id_a) }
}
