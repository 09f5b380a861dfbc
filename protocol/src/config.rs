//! # Protocol Configuration & Constants
//!
//! Every default an election starts with lives here, together with the
//! fixed-point parameters of the native currency. Elections copy these
//! values at creation time; the owner may tune them before launch.

// ---------------------------------------------------------------------------
// Currency
// ---------------------------------------------------------------------------

/// Number of decimal places in the native unit. 8, same as Bitcoin.
pub const DECIMALS: u8 = 8;

/// Base units per whole native unit (`10^DECIMALS`).
pub const UNIT: u64 = 100_000_000;

// ---------------------------------------------------------------------------
// Election Defaults
// ---------------------------------------------------------------------------

/// Default contribution required to cast one vote: 0.01 unit.
pub const DEFAULT_CONTRIBUTION: u64 = UNIT / 100;

/// Basis-point denominator. 10_000 bps = 100%.
pub const BPS_DENOMINATOR: u32 = 10_000;

/// Default operator commission: 1_000 bps = 10% of every contribution.
pub const DEFAULT_COMMISSION_BPS: u32 = 1_000;

/// Default voting window: 3 days.
pub const DEFAULT_VOTING_DURATION_SECS: u64 = 3 * 24 * 60 * 60;

/// Longest voting window an owner may configure: 10 years.
pub const MAX_VOTING_DURATION_SECS: u64 = 10 * 365 * 24 * 60 * 60;

/// Prefix for custody accounts derived by the registry.
pub const CONTRACT_ACCOUNT_PREFIX: &str = "contract:";

/// Converts a percentage into basis points, for callers that think in %.
pub const fn percent_to_bps(percent: u32) -> u32 {
    percent * 100
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_matches_decimals() {
        assert_eq!(UNIT, 10u64.pow(DECIMALS as u32));
    }

    #[test]
    fn defaults_match_reference_deployment() {
        assert_eq!(DEFAULT_CONTRIBUTION, 1_000_000);
        assert_eq!(DEFAULT_COMMISSION_BPS, percent_to_bps(10));
        assert_eq!(DEFAULT_VOTING_DURATION_SECS, 259_200);
    }

    #[test]
    fn commission_fits_denominator() {
        assert!(DEFAULT_COMMISSION_BPS <= BPS_DENOMINATOR);
        assert!(DEFAULT_VOTING_DURATION_SECS <= MAX_VOTING_DURATION_SECS);
    }
}
