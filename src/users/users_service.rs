use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use diesel::r2d2::{self, Pool};
use diesel::sqlite::SqliteConnection;
use log::debug;
use rand::Rng;
use std::sync::Arc;

use super::users_model::{RegisterUser, User, UserDB, UserProfile};
use super::users_repository::UserRepository;
use crate::accounts::{AccountDB, AccountRepository};
use crate::constants::DEFAULT_AGENCY;
use crate::db::DbTransactionExecutor;
use crate::users::{Result, UserError};
use crate::utils::only_digits;

/// Service for registration, login and profile lookups
pub struct UserService {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
}

impl UserService {
    /// Creates a new UserService instance
    pub fn new(pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }

    /// Registers a user and opens their account in one transaction.
    pub async fn register(&self, request: RegisterUser) -> Result<UserProfile> {
        request.validate()?;
        let cpf = request.normalized_cpf();
        debug!("Registering user, cpf ends with {}", &cpf[cpf.len() - 2..]);

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(request.password.as_bytes(), &salt)
            .map_err(|e| UserError::Hash(e.to_string()))?
            .to_string();

        let now = chrono::Utc::now().naive_utc();
        let user_db = UserDB {
            id: uuid::Uuid::new_v4().to_string(),
            name: request.name.trim().to_string(),
            cpf: cpf.clone(),
            password_hash,
            created_at: now,
            updated_at: now,
        };
        let account_db = AccountDB {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: user_db.id.clone(),
            agency: DEFAULT_AGENCY.to_string(),
            number: generate_account_number(),
            balance_cents: 0,
            created_at: now,
            updated_at: now,
        };

        self.pool.execute(|conn| {
            if UserRepository::find_by_cpf_in_tx(conn, &cpf)?.is_some() {
                return Err(UserError::CpfAlreadyRegistered(cpf.clone()));
            }
            UserRepository::create_in_tx(conn, &user_db)?;
            let account = AccountRepository::create_in_tx(conn, &account_db)?;
            Ok(UserProfile {
                user: user_db.clone().into(),
                account,
            })
        })
    }

    /// Verifies credentials and returns the user with their account.
    pub fn login(&self, cpf: &str, password: &str) -> Result<UserProfile> {
        let cpf = only_digits(cpf);
        let repo = UserRepository::new(self.pool.clone());
        let user_db = repo
            .find_by_cpf(&cpf)?
            .ok_or_else(|| UserError::NotFound("User not found".to_string()))?;

        let parsed = PasswordHash::new(&user_db.password_hash)
            .map_err(|e| UserError::Hash(e.to_string()))?;
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .map_err(|_| UserError::InvalidCredentials)?;

        self.profile_for(user_db)
    }

    /// Returns the user and account for an established session.
    pub fn get_profile(&self, user_id: &str) -> Result<UserProfile> {
        let repo = UserRepository::new(self.pool.clone());
        let user_db = repo.get_by_id(user_id)?;
        self.profile_for(user_db)
    }

    fn profile_for(&self, user_db: UserDB) -> Result<UserProfile> {
        let accounts = AccountRepository::new(self.pool.clone());
        let account = accounts.get_by_owner(&user_db.id)?;
        Ok(UserProfile {
            user: User::from(user_db),
            account,
        })
    }
}

/// Six random digits plus a mod-10 check digit, "nnnnnn-d"
fn generate_account_number() -> String {
    let mut rng = rand::thread_rng();
    let n: u32 = rng.gen_range(100_000..1_000_000);
    let dv = n
        .to_string()
        .chars()
        .filter_map(|c| c.to_digit(10))
        .fold(0u32, |acc, d| (acc + d) % 10);
    format!("{}-{}", n, dv)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_number_has_check_digit() {
        for _ in 0..50 {
            let number = generate_account_number();
            let (digits, dv) = number.split_once('-').expect("dash separator");
            assert_eq!(digits.len(), 6);
            let expected = digits
                .chars()
                .filter_map(|c| c.to_digit(10))
                .fold(0u32, |acc, d| (acc + d) % 10);
            assert_eq!(dv.parse::<u32>().unwrap(), expected);
        }
    }
}
