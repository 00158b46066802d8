/// Agency code assigned to every new account
pub const DEFAULT_AGENCY: &str = "0001";

/// Minimum password length accepted at registration
pub const MIN_PASSWORD_LEN: usize = 6;

/// Demo mode relaxes CPF validation to "11 digits, not all identical"
pub const DEMO_MODE: bool = true;

/// Accept any 11-digit sequence as a CPF Pix key (demo). Strict mode
/// requires the official check digits.
pub const LAX_PIX_CPF: bool = true;

/// Maximum length kept for transfer notes and Pix descriptions
pub const MAX_NOTE_LEN: usize = 140;

/// Default and maximum page sizes for ledger listing
pub const LEDGER_DEFAULT_PAGE_SIZE: i64 = 10;
pub const LEDGER_MAX_PAGE_SIZE: i64 = 50;

/// Default lookback window for ledger listing, in days
pub const LEDGER_DEFAULT_SINCE_DAYS: i64 = 30;
