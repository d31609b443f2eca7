use crate::models::user::{PublicUser, User};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

#[derive(Clone, Debug)]
pub struct DashboardService {
    pool: SqlitePool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_users: i64,
    pub users_last_7d: i64,
    pub newest_member: Option<String>,
}

impl DashboardService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get overview statistics for the dashboard
    pub async fn get_dashboard_stats(&self) -> Result<DashboardStats> {
        let total_users = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        let users_last_7d = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users WHERE julianday(created_at) >= julianday('now', '-7 days')",
        )
        .fetch_one(&self.pool)
        .await?;

        let newest_member = sqlx::query_scalar::<_, String>(
            "SELECT email FROM users ORDER BY id DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(DashboardStats {
            total_users,
            users_last_7d,
            newest_member,
        })
    }

    /// Most recent sign-ups, newest first
    pub async fn get_recent_signups(&self, limit: i64) -> Result<Vec<PublicUser>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, created_at
            FROM users
            ORDER BY id DESC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(users.into_iter().map(PublicUser::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_pool, create_test_user};

    #[tokio::test]
    async fn test_stats_on_empty_database() {
        let pool = create_test_pool().await;
        let service = DashboardService::new(pool);

        let stats = service.get_dashboard_stats().await.unwrap();
        assert_eq!(stats.total_users, 0);
        assert_eq!(stats.users_last_7d, 0);
        assert!(stats.newest_member.is_none());
    }

    #[tokio::test]
    async fn test_stats_count_users_and_newest_member() {
        let pool = create_test_pool().await;
        create_test_user(&pool, "first@example.com", "password123")
            .await
            .unwrap();
        create_test_user(&pool, "second@example.com", "password123")
            .await
            .unwrap();

        let service = DashboardService::new(pool);
        let stats = service.get_dashboard_stats().await.unwrap();

        assert_eq!(stats.total_users, 2);
        assert_eq!(stats.users_last_7d, 2);
        assert_eq!(stats.newest_member.as_deref(), Some("second@example.com"));
    }

    #[tokio::test]
    async fn test_recent_signups_respects_limit() {
        let pool = create_test_pool().await;
        for i in 0..6 {
            create_test_user(&pool, &format!("user{}@example.com", i), "password123")
                .await
                .unwrap();
        }

        let service = DashboardService::new(pool);
        let recent = service.get_recent_signups(5).await.unwrap();

        assert_eq!(recent.len(), 5);
        assert_eq!(recent[0].email, "user5@example.com");
    }
}
