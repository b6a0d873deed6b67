//! Custom actions for the stock ledger actors.
//!
//! Every quantity change goes through one of these actions. The owning actor applies
//! each one as a single step, so a check and the write that depends on it can never be
//! separated by another request for the same row.

/// Custom actions for [`StockEntry`](crate::model::StockEntry) rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockAction {
    /// Reads the current quantity without modifying it.
    Check,
    /// Decrements by the amount only if the row holds at least that much.
    Reserve(u32),
    /// Gives back a previous reservation.
    Release(u32),
    /// Adds restocked units.
    Credit(u32),
}

/// Outcome of a reservation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReserveOutcome {
    /// The amount was taken; `remaining` is the quantity left afterwards.
    Reserved { remaining: u32 },
    /// Nothing was taken; `available` is the quantity at the time of the attempt.
    Insufficient { available: u32 },
    /// No row exists for the key.
    NotFound,
}

/// Results from [`StockAction`]s - variants match 1:1 with the action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockActionResult {
    Check(u32),
    Reserve(ReserveOutcome),
    /// Quantity after the release.
    Release(u32),
    /// Quantity after the credit.
    Credit(u32),
}
