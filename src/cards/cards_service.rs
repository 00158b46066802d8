use chrono::Datelike;
use diesel::r2d2::{self, Pool};
use diesel::sqlite::SqliteConnection;
use log::debug;
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::str::FromStr;
use std::sync::Arc;

use super::cards_model::{Card, CardAction, CardDB, CardStatus, CardType, CardUpdate, NewCard};
use super::cards_repository::CardRepository;
use crate::accounts::AccountRepository;
use crate::cards::{CardError, Result};

const DEFAULT_BRAND: &str = "VISA";

/// Service for card issuance and lifecycle management
pub struct CardService {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
}

impl CardService {
    /// Creates a new CardService instance
    pub fn new(pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }

    /// Issues a card with cosmetic random material (last4, expiry, token).
    pub async fn issue_card(&self, new_card: NewCard) -> Result<Card> {
        new_card.validate()?;

        // Account must exist
        let accounts = AccountRepository::new(self.pool.clone());
        accounts.get_by_id(&new_card.account_id)?;

        let (exp_month, exp_year) = gen_expiry();
        let now = chrono::Utc::now().naive_utc();
        let is_credit = new_card.card_type == CardType::Credit;

        let card_db = CardDB {
            id: uuid::Uuid::new_v4().to_string(),
            account_id: new_card.account_id.clone(),
            card_type: new_card.card_type.as_str().to_string(),
            is_virtual: new_card.is_virtual,
            brand: new_card
                .brand
                .unwrap_or_else(|| DEFAULT_BRAND.to_string()),
            holder_name: new_card.holder_name.trim().to_string(),
            last4: gen_last4(),
            pan_token: gen_pan_token(),
            exp_month,
            exp_year,
            status: CardStatus::Active.as_str().to_string(),
            credit_limit_cents: if is_credit {
                new_card.credit_limit_cents
            } else {
                None
            },
            available_credit_cents: if is_credit {
                new_card.credit_limit_cents
            } else {
                None
            },
            created_at: now,
            updated_at: now,
        };
        debug!(
            "Issuing {} card ending {} for account {}",
            card_db.card_type, card_db.last4, card_db.account_id
        );

        let repo = CardRepository::new(self.pool.clone());
        repo.create(&card_db)
    }

    /// Applies a status action and/or a credit-limit change.
    pub async fn update_card(&self, card_id: &str, update: CardUpdate) -> Result<Card> {
        let repo = CardRepository::new(self.pool.clone());
        let card = repo.get_db_by_id(card_id)?;
        let status = CardStatus::from_str(&card.status)?;

        if let Some(action) = update.action {
            match action {
                CardAction::Block if status != CardStatus::Canceled => {
                    repo.set_status(card_id, CardStatus::Blocked)?;
                }
                CardAction::Unblock if status == CardStatus::Blocked => {
                    repo.set_status(card_id, CardStatus::Active)?;
                }
                CardAction::Cancel => {
                    repo.set_status(card_id, CardStatus::Canceled)?;
                }
                // BLOCK on a canceled card and UNBLOCK on a non-blocked one
                // are no-ops
                _ => {}
            }
        }

        if let Some(new_limit) = update.credit_limit_cents {
            if card.card_type != CardType::Credit.as_str() {
                return Err(CardError::InvalidData(
                    "Only credit cards have a limit".to_string(),
                ));
            }
            if new_limit <= 0 {
                return Err(CardError::InvalidData(
                    "Credit limit must be greater than zero".to_string(),
                ));
            }

            // Keep the amount already used; available credit absorbs the delta
            let prev_limit = card.credit_limit_cents.unwrap_or(0);
            let used = prev_limit - card.available_credit_cents.unwrap_or(prev_limit);
            let new_available = (new_limit - used).max(0);
            repo.set_credit_limit(card_id, new_limit, new_available)?;
        }

        repo.get_by_id(card_id)
    }

    /// Retrieves a card by its ID
    pub fn get_card(&self, card_id: &str) -> Result<Card> {
        let repo = CardRepository::new(self.pool.clone());
        repo.get_by_id(card_id)
    }

    /// Lists an account's cards, newest first
    pub fn list_cards(&self, account_id: &str) -> Result<Vec<Card>> {
        let repo = CardRepository::new(self.pool.clone());
        repo.list(account_id)
    }
}

fn gen_last4() -> String {
    let mut rng = rand::thread_rng();
    format!("{:04}", rng.gen_range(0..10_000))
}

/// Expiry 2 to 5 years out, random month
fn gen_expiry() -> (i32, i32) {
    let mut rng = rand::thread_rng();
    let month = rng.gen_range(1..=12);
    let year = chrono::Utc::now().year() + rng.gen_range(2..=5);
    (month, year)
}

/// Random token identifying the card; not a real PAN
fn gen_pan_token() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(24)
        .map(char::from)
        .collect();
    format!("tok_{}", suffix.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last4_is_zero_padded() {
        for _ in 0..100 {
            let last4 = gen_last4();
            assert_eq!(last4.len(), 4);
            assert!(last4.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn expiry_is_in_the_future() {
        let current_year = chrono::Utc::now().year();
        for _ in 0..20 {
            let (month, year) = gen_expiry();
            assert!((1..=12).contains(&month));
            assert!(year >= current_year + 2 && year <= current_year + 5);
        }
    }

    #[test]
    fn pan_token_is_prefixed() {
        let token = gen_pan_token();
        assert!(token.starts_with("tok_"));
        assert_eq!(token.len(), 28);
    }

    #[test]
    fn credit_card_requires_limit() {
        let request = NewCard {
            account_id: "acc".to_string(),
            card_type: CardType::Credit,
            is_virtual: false,
            brand: None,
            holder_name: "ANA SOUZA".to_string(),
            credit_limit_cents: None,
        };
        assert!(request.validate().is_err());

        let ok = NewCard {
            credit_limit_cents: Some(50_000),
            ..request
        };
        assert!(ok.validate().is_ok());
    }
}
