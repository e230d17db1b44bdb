//! crates/signal_client_core/src/domain.rs
//!
//! Defines the pure, core data structures for the client.
//! These structs are independent of the wire format; the service crate maps
//! its serde records into them.

use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone, Utc};

use crate::pagination::{compute_window, DEFAULT_WINDOW_SIZE};

//=========================================================================================
// Authentication
//=========================================================================================

/// The client-held proof of authentication.
///
/// A session is valid while its token is non-empty and its expiry (when set)
/// lies in the future. `expires_at` is in epoch seconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    pub email: Option<String>,
    pub token: String,
    pub expires_at: Option<i64>,
}

impl Session {
    /// Returns `true` if the session can still be presented to the backend at `now`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        if self.token.is_empty() {
            return false;
        }
        match self.expires_at {
            Some(expires_at) => expires_at.saturating_mul(1000) > now.timestamp_millis(),
            None => true,
        }
    }

    /// Returns `true` if the session has a set expiry that has already passed.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at
            .is_some_and(|expires_at| expires_at.saturating_mul(1000) <= now.timestamp_millis())
    }
}

/// What the login endpoint grants on success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginGrant {
    pub user_id: String,
    pub token: String,
    pub expires_at: Option<i64>,
}

/// The user details returned by the info endpoint.
///
/// Only `email` is guaranteed; everything else the server sends is kept verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct UserDetails {
    pub email: String,
    pub extra: BTreeMap<String, String>,
}

//=========================================================================================
// Watch-list
//=========================================================================================

/// A market symbol on the user's watch-list. `symbol` is lowercase and unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolEntry {
    pub symbol: String,
    pub is_valid: bool,
    pub created_at: Option<DateTime<Utc>>,
}

//=========================================================================================
// Backtest records
//=========================================================================================

/// Lifecycle state of one backtest trade cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordStatus {
    PendingBuy,
    AwaitingSell,
    BuyFailed,
    PendingSell,
    Sold,
    MarketSold,
    Unknown(i64),
}

impl RecordStatus {
    pub const ALL: [RecordStatus; 6] = [
        RecordStatus::PendingBuy,
        RecordStatus::AwaitingSell,
        RecordStatus::BuyFailed,
        RecordStatus::PendingSell,
        RecordStatus::Sold,
        RecordStatus::MarketSold,
    ];

    pub fn from_code(code: i64) -> Self {
        match code {
            0 => RecordStatus::PendingBuy,
            1 => RecordStatus::AwaitingSell,
            2 => RecordStatus::BuyFailed,
            3 => RecordStatus::PendingSell,
            4 => RecordStatus::Sold,
            5 => RecordStatus::MarketSold,
            other => RecordStatus::Unknown(other),
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            RecordStatus::PendingBuy => 0,
            RecordStatus::AwaitingSell => 1,
            RecordStatus::BuyFailed => 2,
            RecordStatus::PendingSell => 3,
            RecordStatus::Sold => 4,
            RecordStatus::MarketSold => 5,
            RecordStatus::Unknown(code) => *code,
        }
    }

    /// A short human-readable description of the status.
    pub fn label(&self) -> &'static str {
        match self {
            RecordStatus::PendingBuy => "buy order pending",
            RecordStatus::AwaitingSell => "bought, awaiting sell",
            RecordStatus::BuyFailed => "buy failed",
            RecordStatus::PendingSell => "sell order pending",
            RecordStatus::Sold => "sold",
            RecordStatus::MarketSold => "sell order failed, sold at market",
            RecordStatus::Unknown(_) => "unknown status",
        }
    }
}

/// Sign of a trade's `profit_percent`, used for colouring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfitDirection {
    Gain,
    Loss,
    Flat,
}

impl ProfitDirection {
    pub fn of(profit_percent: &str) -> Self {
        let trimmed = profit_percent.trim();
        if trimmed.starts_with('-') {
            ProfitDirection::Loss
        } else if trimmed.is_empty() || trimmed == "0.0%" {
            ProfitDirection::Flat
        } else {
            ProfitDirection::Gain
        }
    }
}

/// An immutable snapshot of one trade cycle. Never mutated client-side.
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestRecord {
    pub id: String,
    pub symbol: String,
    pub buy_price: String,
    pub buy_at: Option<DateTime<Utc>>,
    pub sell_price: String,
    pub sell_at: Option<DateTime<Utc>>,
    /// Seconds between buy and sell.
    pub hold_time: i64,
    pub profit_percent: String,
    pub status: RecordStatus,
    pub status_text: String,
}

impl BacktestRecord {
    pub fn profit_direction(&self) -> ProfitDirection {
        ProfitDirection::of(&self.profit_percent)
    }
}

/// The full detail of one record, including the bid/ask order legs.
///
/// Every field is optional: the server may send an empty object, and the
/// client hands back `BacktestDetail::default()` when no data arrives at all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BacktestDetail {
    pub id: Option<String>,
    pub symbol: Option<String>,
    pub bid_curr_price: Option<String>,
    pub bid_price: Option<String>,
    pub bid_at: Option<DateTime<Utc>>,
    pub bid_plot_type: Option<i64>,
    pub bid_plot_msg: Option<String>,
    pub buy_price: Option<String>,
    pub buy_at: Option<DateTime<Utc>>,
    pub ask_curr_price: Option<String>,
    pub ask_price: Option<String>,
    pub ask_at: Option<DateTime<Utc>>,
    pub ask_plot_type: Option<i64>,
    pub ask_plot_msg: Option<String>,
    pub sell_price: Option<String>,
    pub sell_at: Option<DateTime<Utc>>,
    pub hold_time: Option<i64>,
    pub profit_percent: Option<String>,
    pub status: Option<RecordStatus>,
    pub status_text: Option<String>,
}

impl BacktestDetail {
    pub fn is_empty(&self) -> bool {
        *self == BacktestDetail::default()
    }

    pub fn profit_direction(&self) -> ProfitDirection {
        ProfitDirection::of(self.profit_percent.as_deref().unwrap_or_default())
    }
}

//=========================================================================================
// Pagination
//=========================================================================================

/// Pagination metadata returned alongside a page of records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationInfo {
    pub current_page: u32,
    pub page_size: u32,
    pub total_count: u64,
    pub total_pages: u32,
}

impl PaginationInfo {
    /// The metadata reported for a page with no records at all.
    pub fn empty(page: u32, page_size: u32) -> Self {
        Self {
            current_page: page,
            page_size,
            total_count: 0,
            total_pages: 0,
        }
    }

    /// Builds consistent metadata from a total count, clamping the current page.
    pub fn from_total(page: u32, page_size: u32, total_count: u64) -> Self {
        let total_pages = if page_size == 0 {
            0
        } else {
            u32::try_from(total_count.div_ceil(u64::from(page_size))).unwrap_or(u32::MAX)
        };
        Self {
            current_page: page.clamp(1, total_pages.max(1)),
            page_size,
            total_count,
            total_pages,
        }
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// The page numbers to expose as pagination controls.
    pub fn window(&self) -> Vec<u32> {
        compute_window(self.current_page, self.total_pages, DEFAULT_WINDOW_SIZE)
    }
}

/// One page of backtest records.
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestPage {
    pub records: Vec<BacktestRecord>,
    pub pagination: PaginationInfo,
}

impl BacktestPage {
    pub fn empty(page: u32, page_size: u32) -> Self {
        Self {
            records: Vec::new(),
            pagination: PaginationInfo::empty(page, page_size),
        }
    }
}

//=========================================================================================
// Helpers
//=========================================================================================

/// Converts wire epoch seconds into a timestamp. `0` means "not set".
pub fn timestamp_from_epoch(seconds: i64) -> Option<DateTime<Utc>> {
    if seconds == 0 {
        return None;
    }
    Utc.timestamp_opt(seconds, 0).single()
}

/// Renders an optional timestamp for display, `-` when unset.
pub fn format_timestamp(at: Option<DateTime<Utc>>) -> String {
    match at {
        Some(at) => at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => "-".to_string(),
    }
}
