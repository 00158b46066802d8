use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use minibanco_core::db::{run_migrations, DbPool};
use minibanco_core::users::{RegisterUser, UserProfile, UserService};

/// In-memory database with a single connection so every handle sees the
/// same data.
pub fn create_test_pool() -> Arc<DbPool> {
    let manager = ConnectionManager::<SqliteConnection>::new(":memory:");
    let pool = Pool::builder()
        .max_size(1)
        .build(manager)
        .expect("failed to create test pool");
    run_migrations(&pool).expect("failed to run migrations");
    Arc::new(pool)
}

pub async fn register_user(pool: &Arc<DbPool>, name: &str, cpf: &str) -> UserProfile {
    let service = UserService::new(pool.clone());
    service
        .register(RegisterUser {
            name: name.to_string(),
            cpf: cpf.to_string(),
            password: "secret1".to_string(),
        })
        .await
        .expect("failed to register user")
}
