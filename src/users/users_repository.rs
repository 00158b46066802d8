use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use crate::db::get_connection;
use crate::schema::users;
use crate::users::{Result, UserError};

use super::users_model::UserDB;

/// Repository for managing user data in the database
pub struct UserRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
}

impl UserRepository {
    /// Creates a new UserRepository instance
    pub fn new(pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }

    /// Retrieves a user by its ID
    pub fn get_by_id(&self, user_id: &str) -> Result<UserDB> {
        let mut conn =
            get_connection(&self.pool).map_err(|e| UserError::DatabaseError(e.to_string()))?;

        users::table
            .find(user_id)
            .first::<UserDB>(&mut conn)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => {
                    UserError::NotFound(format!("User with id {} not found", user_id))
                }
                _ => UserError::DatabaseError(e.to_string()),
            })
    }

    /// Looks a user up by normalized CPF; Ok(None) when absent
    pub fn find_by_cpf(&self, cpf: &str) -> Result<Option<UserDB>> {
        let mut conn =
            get_connection(&self.pool).map_err(|e| UserError::DatabaseError(e.to_string()))?;

        Ok(users::table
            .filter(users::cpf.eq(cpf))
            .first::<UserDB>(&mut conn)
            .optional()?)
    }

    /// CPF lookup inside an enclosing transaction
    pub fn find_by_cpf_in_tx(conn: &mut SqliteConnection, cpf: &str) -> Result<Option<UserDB>> {
        Ok(users::table
            .filter(users::cpf.eq(cpf))
            .first::<UserDB>(conn)
            .optional()?)
    }

    /// Inserts a new user row as part of an enclosing transaction
    pub fn create_in_tx(conn: &mut SqliteConnection, user_db: &UserDB) -> Result<()> {
        diesel::insert_into(users::table)
            .values(user_db)
            .execute(conn)?;
        Ok(())
    }
}
