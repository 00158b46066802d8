/// Ledger entry kinds
/// Incoming funds from outside the bank. Increases the balance.
pub const LEDGER_KIND_DEPOSIT: &str = "DEPOSIT";

/// Outgoing funds to the outside world. Decreases the balance.
pub const LEDGER_KIND_WITHDRAW: &str = "WITHDRAW";

/// Movement between two accounts, including Pix sends.
pub const LEDGER_KIND_TRANSFER: &str = "TRANSFER";
