use std::sync::Arc;

use log::info;
use uuid::Uuid;

use crate::{
    api::error,
    modules::friendship::{
        repository::FriendshipRepository,
        schema::{FriendshipEntity, FriendshipStatus},
    },
};

/// Records the outcome of a friendship operation on the current span.
fn trace_outcome<T>(result: Result<T, error::SystemError>) -> Result<T, error::SystemError> {
    match &result {
        Ok(_) => tracing::debug!(outcome = "ok"),
        Err(err) if err.kind() == "internal" => {
            tracing::error!(outcome = "error", kind = err.kind(), error = %err)
        }
        Err(err) => tracing::info!(outcome = "error", kind = err.kind(), error = %err),
    }
    result
}

#[derive(Clone)]
pub struct FriendshipService {
    repo: Arc<dyn FriendshipRepository>,
}

impl FriendshipService {
    pub fn with_dependencies(repo: Arc<dyn FriendshipRepository>) -> Self {
        info!("FriendshipService initialized with dependencies");
        FriendshipService { repo }
    }

    #[tracing::instrument(name = "friendship.send_request", skip(self))]
    pub async fn send_friend_request(
        &self,
        requester_id: Uuid,
        receiver_id: Uuid,
    ) -> Result<FriendshipEntity, error::SystemError> {
        let result: Result<FriendshipEntity, error::SystemError> = async {
            if requester_id == receiver_id {
                return Err(error::SystemError::bad_request(
                    "Cannot send friend request to yourself",
                ));
            }

            if let Some(existing) = self.find_existing_friendship(&requester_id, &receiver_id).await?
            {
                if existing.is_declined() {
                    return Err(error::SystemError::conflict(
                        "Friendship already exists with status: declined; remove it before sending a new request",
                    ));
                }
                return Err(error::SystemError::conflict(format!(
                    "Friendship already exists with status: {}",
                    existing.status
                )));
            }

            // a racing request for the same pair is rejected by the store
            self.repo.insert(&requester_id, &receiver_id).await
        }
        .await;

        trace_outcome(result)
    }

    #[tracing::instrument(name = "friendship.accept_request", skip(self))]
    pub async fn accept_friend_request(
        &self,
        friendship_id: Uuid,
        user_id: Uuid,
    ) -> Result<FriendshipEntity, error::SystemError> {
        trace_outcome(self.respond(friendship_id, user_id, FriendshipStatus::Accepted).await)
    }

    #[tracing::instrument(name = "friendship.decline_request", skip(self))]
    pub async fn decline_friend_request(
        &self,
        friendship_id: Uuid,
        user_id: Uuid,
    ) -> Result<FriendshipEntity, error::SystemError> {
        trace_outcome(self.respond(friendship_id, user_id, FriendshipStatus::Declined).await)
    }

    /// Cancels a pending request or ends a friendship; either participant may do it.
    #[tracing::instrument(name = "friendship.remove", skip(self))]
    pub async fn remove_friendship(
        &self,
        friendship_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), error::SystemError> {
        let result: Result<(), error::SystemError> = async {
            let friendship = self.find_or_not_found(&friendship_id).await?;

            if !friendship.involves_user(&user_id) {
                return Err(error::SystemError::forbidden("User is not part of this friendship"));
            }

            if !self.repo.delete(&friendship_id).await? {
                return Err(not_found(&friendship_id));
            }

            Ok(())
        }
        .await;

        trace_outcome(result)
    }

    #[tracing::instrument(name = "friendship.pending_requests", skip(self))]
    pub async fn get_pending_requests(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<FriendshipEntity>, error::SystemError> {
        trace_outcome(
            self.repo.find_by_receiver_and_status(&user_id, FriendshipStatus::Pending).await,
        )
    }

    #[tracing::instrument(name = "friendship.all", skip(self))]
    pub async fn get_all_friendships(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<FriendshipEntity>, error::SystemError> {
        trace_outcome(self.repo.find_by_either_participant(&user_id).await)
    }

    #[tracing::instrument(name = "friendship.accepted", skip(self))]
    pub async fn get_accepted_friends(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<FriendshipEntity>, error::SystemError> {
        let result = self
            .repo
            .find_by_either_participant(&user_id)
            .await
            .map(|all| all.into_iter().filter(FriendshipEntity::is_accepted).collect());

        trace_outcome(result)
    }

    #[tracing::instrument(name = "friendship.friend_ids", skip(self))]
    pub async fn get_friend_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, error::SystemError> {
        trace_outcome(self.repo.find_friend_ids(&user_id).await)
    }

    #[tracing::instrument(name = "friendship.by_id", skip(self))]
    pub async fn get_friendship_by_id(
        &self,
        friendship_id: Uuid,
    ) -> Result<Option<FriendshipEntity>, error::SystemError> {
        trace_outcome(self.repo.find_by_id(&friendship_id).await)
    }

    #[tracing::instrument(name = "friendship.are_friends", skip(self))]
    pub async fn are_friends(
        &self,
        user_id_a: Uuid,
        user_id_b: Uuid,
    ) -> Result<bool, error::SystemError> {
        let result = self
            .find_existing_friendship(&user_id_a, &user_id_b)
            .await
            .map(|existing| existing.is_some_and(|f| f.is_accepted()));

        trace_outcome(result)
    }

    /// Directional: only a request sent by `requester_id` to `receiver_id` counts.
    #[tracing::instrument(name = "friendship.has_pending", skip(self))]
    pub async fn has_pending_request(
        &self,
        requester_id: Uuid,
        receiver_id: Uuid,
    ) -> Result<bool, error::SystemError> {
        let result = self
            .repo
            .find_by_direction_and_status(&requester_id, &receiver_id, FriendshipStatus::Pending)
            .await
            .map(|f| f.is_some());

        trace_outcome(result)
    }

    async fn respond(
        &self,
        friendship_id: Uuid,
        user_id: Uuid,
        target: FriendshipStatus,
    ) -> Result<FriendshipEntity, error::SystemError> {
        let friendship = self.find_or_not_found(&friendship_id).await?;

        if friendship.receiver_id != user_id {
            return Err(error::SystemError::forbidden(format!(
                "Only the receiver can {} the friend request",
                action_verb(target)
            )));
        }

        if !friendship.is_pending() {
            return Err(error::SystemError::invalid_state("Friend request is not pending"));
        }

        match self.repo.update_status(&friendship_id, friendship.status, target).await? {
            Some(updated) => Ok(updated),
            // lost a race: deleted, or already moved out of pending
            None => match self.repo.find_by_id(&friendship_id).await? {
                Some(_) => Err(error::SystemError::invalid_state("Friend request is not pending")),
                None => Err(not_found(&friendship_id)),
            },
        }
    }

    async fn find_or_not_found(
        &self,
        friendship_id: &Uuid,
    ) -> Result<FriendshipEntity, error::SystemError> {
        self.repo.find_by_id(friendship_id).await?.ok_or_else(|| not_found(friendship_id))
    }

    /// Looks for a record between the two users in either direction.
    async fn find_existing_friendship(
        &self,
        user_id_a: &Uuid,
        user_id_b: &Uuid,
    ) -> Result<Option<FriendshipEntity>, error::SystemError> {
        let friendships = self.repo.find_by_either_participant(user_id_a).await?;
        Ok(friendships.into_iter().find(|f| f.involves_user(user_id_b)))
    }
}

fn not_found(friendship_id: &Uuid) -> error::SystemError {
    error::SystemError::not_found(format!("Friendship not found with id: {friendship_id}"))
}

fn action_verb(target: FriendshipStatus) -> &'static str {
    match target {
        FriendshipStatus::Accepted => "accept",
        FriendshipStatus::Declined => "decline",
        FriendshipStatus::Pending => "update",
    }
}
