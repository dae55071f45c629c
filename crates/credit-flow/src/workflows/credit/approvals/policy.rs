use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Signing authority tier derived from the requested amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalTier {
    SingleDirector,
    DualDirector,
    Board,
}

impl ApprovalTier {
    pub const fn label(self) -> &'static str {
        match self {
            Self::SingleDirector => "single director",
            Self::DualDirector => "dual director",
            Self::Board => "board approval",
        }
    }
}

/// Three-tier signature mandate: amounts below the single-director limit need
/// one signature, amounts below the board limit need two, and everything at
/// or above the board limit needs the configured board quorum. The board
/// quorum is a constant, never derived from the amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignaturePolicy {
    pub single_director_limit: f64,
    pub board_limit: f64,
    pub board_quorum: u32,
    pub signing_window_days: i64,
}

impl SignaturePolicy {
    pub fn standard() -> Self {
        Self {
            single_director_limit: 250_000.0,
            board_limit: 1_000_000.0,
            board_quorum: 3,
            signing_window_days: 7,
        }
    }

    pub fn tier(&self, amount: f64) -> ApprovalTier {
        if amount < self.single_director_limit {
            ApprovalTier::SingleDirector
        } else if amount < self.board_limit {
            ApprovalTier::DualDirector
        } else {
            ApprovalTier::Board
        }
    }

    pub fn required_quorum(&self, amount: f64) -> u32 {
        match self.tier(amount) {
            ApprovalTier::SingleDirector => 1,
            ApprovalTier::DualDirector => 2,
            ApprovalTier::Board => self.board_quorum,
        }
    }

    pub fn signing_window(&self) -> Duration {
        Duration::days(self.signing_window_days)
    }
}

impl Default for SignaturePolicy {
    fn default() -> Self {
        Self::standard()
    }
}
