use uuid::Uuid;

use crate::{
    api::error,
    modules::friendship::{
        repository::FriendshipRepository,
        schema::{FriendshipEntity, FriendshipStatus},
    },
};

#[derive(Clone)]
pub struct FriendshipRepositoryPg {
    pool: sqlx::PgPool,
}

impl FriendshipRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl FriendshipRepository for FriendshipRepositoryPg {
    async fn insert(
        &self,
        requester_id: &Uuid,
        receiver_id: &Uuid,
    ) -> Result<FriendshipEntity, error::SystemError> {
        let id = Uuid::now_v7();

        // uq_friendships_pair turns a racing duplicate into 23505
        let friendship = sqlx::query_as::<_, FriendshipEntity>(
            r#"
            INSERT INTO friendships (id, requester_id, receiver_id, status)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(requester_id)
        .bind(receiver_id)
        .bind(FriendshipStatus::Pending)
        .fetch_one(&self.pool)
        .await?;

        Ok(friendship)
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<FriendshipEntity>, error::SystemError> {
        let friendship =
            sqlx::query_as::<_, FriendshipEntity>("SELECT * FROM friendships WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(friendship)
    }

    async fn find_by_either_participant(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendshipEntity>, error::SystemError> {
        let friendships = sqlx::query_as::<_, FriendshipEntity>(
            r#"
            SELECT *
            FROM friendships
            WHERE requester_id = $1
               OR receiver_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(friendships)
    }

    async fn find_by_receiver_and_status(
        &self,
        receiver_id: &Uuid,
        status: FriendshipStatus,
    ) -> Result<Vec<FriendshipEntity>, error::SystemError> {
        let friendships = sqlx::query_as::<_, FriendshipEntity>(
            r#"
            SELECT *
            FROM friendships
            WHERE receiver_id = $1
              AND status = $2
            ORDER BY created_at, id
            "#,
        )
        .bind(receiver_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(friendships)
    }

    async fn find_by_direction_and_status(
        &self,
        requester_id: &Uuid,
        receiver_id: &Uuid,
        status: FriendshipStatus,
    ) -> Result<Option<FriendshipEntity>, error::SystemError> {
        let friendship = sqlx::query_as::<_, FriendshipEntity>(
            r#"
            SELECT *
            FROM friendships
            WHERE requester_id = $1
              AND receiver_id = $2
              AND status = $3
            "#,
        )
        .bind(requester_id)
        .bind(receiver_id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;

        Ok(friendship)
    }

    async fn find_friend_ids(&self, user_id: &Uuid) -> Result<Vec<Uuid>, error::SystemError> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT
                CASE
                    WHEN f.requester_id = $1 THEN f.receiver_id
                    ELSE f.requester_id
                END
            FROM friendships f
            WHERE (f.requester_id = $1 OR f.receiver_id = $1)
              AND f.status = $2
            ORDER BY f.created_at, f.id
            "#,
        )
        .bind(user_id)
        .bind(FriendshipStatus::Accepted)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    async fn update_status(
        &self,
        id: &Uuid,
        expected: FriendshipStatus,
        next: FriendshipStatus,
    ) -> Result<Option<FriendshipEntity>, error::SystemError> {
        let friendship = sqlx::query_as::<_, FriendshipEntity>(
            r#"
            UPDATE friendships
            SET status = $3
            WHERE id = $1
              AND status = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(expected)
        .bind(next)
        .fetch_optional(&self.pool)
        .await?;

        Ok(friendship)
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, error::SystemError> {
        let rows = sqlx::query("DELETE FROM friendships WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows > 0)
    }
}
