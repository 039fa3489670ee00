use std::collections::{BTreeMap, HashMap};

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    api::error,
    modules::friendship::{
        repository::FriendshipRepository,
        schema::{FriendshipEntity, FriendshipStatus, normalized_pair},
    },
};

#[derive(Default)]
struct Tables {
    // v7 ids sort by creation time
    friendships: BTreeMap<Uuid, FriendshipEntity>,
    pairs: HashMap<(Uuid, Uuid), Uuid>,
}

/// In-process store. Every write holds the lock across its check and its mutation.
#[derive(Default)]
pub struct FriendshipRepositoryMemory {
    tables: RwLock<Tables>,
}

impl FriendshipRepositoryMemory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl FriendshipRepository for FriendshipRepositoryMemory {
    async fn insert(
        &self,
        requester_id: &Uuid,
        receiver_id: &Uuid,
    ) -> Result<FriendshipEntity, error::SystemError> {
        if requester_id == receiver_id {
            return Err(error::SystemError::bad_request("Cannot send friend request to yourself"));
        }

        let mut tables = self.tables.write().await;
        let pair = normalized_pair(requester_id, receiver_id);
        if tables.pairs.contains_key(&pair) {
            return Err(error::SystemError::conflict(
                "Friendship already exists between these users",
            ));
        }

        let friendship = FriendshipEntity {
            id: Uuid::now_v7(),
            requester_id: *requester_id,
            receiver_id: *receiver_id,
            status: FriendshipStatus::Pending,
            created_at: chrono::Utc::now(),
        };
        tables.pairs.insert(pair, friendship.id);
        tables.friendships.insert(friendship.id, friendship.clone());

        Ok(friendship)
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<FriendshipEntity>, error::SystemError> {
        Ok(self.tables.read().await.friendships.get(id).cloned())
    }

    async fn find_by_either_participant(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendshipEntity>, error::SystemError> {
        let tables = self.tables.read().await;
        Ok(tables.friendships.values().filter(|f| f.involves_user(user_id)).cloned().collect())
    }

    async fn find_by_receiver_and_status(
        &self,
        receiver_id: &Uuid,
        status: FriendshipStatus,
    ) -> Result<Vec<FriendshipEntity>, error::SystemError> {
        let tables = self.tables.read().await;
        Ok(tables
            .friendships
            .values()
            .filter(|f| f.receiver_id == *receiver_id && f.status == status)
            .cloned()
            .collect())
    }

    async fn find_by_direction_and_status(
        &self,
        requester_id: &Uuid,
        receiver_id: &Uuid,
        status: FriendshipStatus,
    ) -> Result<Option<FriendshipEntity>, error::SystemError> {
        let tables = self.tables.read().await;
        Ok(tables
            .pairs
            .get(&normalized_pair(requester_id, receiver_id))
            .and_then(|id| tables.friendships.get(id))
            .filter(|f| {
                f.requester_id == *requester_id
                    && f.receiver_id == *receiver_id
                    && f.status == status
            })
            .cloned())
    }

    async fn find_friend_ids(&self, user_id: &Uuid) -> Result<Vec<Uuid>, error::SystemError> {
        let tables = self.tables.read().await;
        Ok(tables
            .friendships
            .values()
            .filter(|f| f.is_accepted())
            .filter_map(|f| f.other_user(user_id))
            .collect())
    }

    async fn update_status(
        &self,
        id: &Uuid,
        expected: FriendshipStatus,
        next: FriendshipStatus,
    ) -> Result<Option<FriendshipEntity>, error::SystemError> {
        let mut tables = self.tables.write().await;
        match tables.friendships.get_mut(id) {
            Some(friendship)
                if friendship.status == expected && expected.can_transition_to(next) =>
            {
                friendship.status = next;
                Ok(Some(friendship.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, error::SystemError> {
        let mut tables = self.tables.write().await;
        match tables.friendships.remove(id) {
            Some(friendship) => {
                tables.pairs.remove(&friendship.pair());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
