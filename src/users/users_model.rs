use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::accounts::Account;
use crate::constants::MIN_PASSWORD_LEN;
use crate::users::{Result, UserError};
use crate::utils::{only_digits, validate_cpf};

/// Domain model representing a registered user. The password hash never
/// leaves the database layer.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub cpf: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for registration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUser {
    pub name: String,
    pub cpf: String,
    pub password: String,
}

impl RegisterUser {
    /// Validates the registration data before any business logic runs
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().len() < 2 {
            return Err(UserError::InvalidData("Name is too short".to_string()));
        }
        if !validate_cpf(&self.cpf) {
            return Err(UserError::InvalidData("Invalid CPF".to_string()));
        }
        if self.password.len() < MIN_PASSWORD_LEN {
            return Err(UserError::InvalidData(format!(
                "Password must have at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        Ok(())
    }

    /// CPF normalized to bare digits
    pub fn normalized_cpf(&self) -> String {
        only_digits(&self.cpf)
    }
}

/// A user together with their account, as returned by register/login/profile
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user: User,
    pub account: Account,
}

/// Database model for users
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserDB {
    pub id: String,
    pub name: String,
    pub cpf: String,
    pub password_hash: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

// Conversion implementations
impl From<UserDB> for User {
    fn from(db: UserDB) -> Self {
        Self {
            id: db.id,
            name: db.name,
            cpf: db.cpf,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, cpf: &str, password: &str) -> RegisterUser {
        RegisterUser {
            name: name.to_string(),
            cpf: cpf.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn accepts_well_formed_registration() {
        assert!(request("Ana Souza", "529.982.247-25", "secret1").validate().is_ok());
    }

    #[test]
    fn rejects_short_name_cpf_and_password() {
        assert!(request("A", "52998224725", "secret1").validate().is_err());
        assert!(request("Ana", "123", "secret1").validate().is_err());
        assert!(request("Ana", "52998224725", "12345").validate().is_err());
    }
}
