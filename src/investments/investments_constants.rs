/// Position lifecycle states
/// Accruing; redeemable once the liquidity window has elapsed.
pub const POSITION_STATUS_ACTIVE: &str = "ACTIVE";

/// Settled by a full redemption. Terminal, immutable, deletable.
pub const POSITION_STATUS_CLOSED: &str = "CLOSED";

/// Fee charged on the gain proportional to the redeemed value.
pub const REDEMPTION_FEE_RATE: f64 = 0.01;
