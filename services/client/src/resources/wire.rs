//! services/client/src/resources/wire.rs
//!
//! "Impure" serde records mirroring the backend's JSON payloads, each mapped
//! into its pure domain type with `to_domain`.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Map, Value};
use signal_client_core::domain::{
    timestamp_from_epoch, BacktestDetail, BacktestPage, BacktestRecord, LoginGrant,
    PaginationInfo, RecordStatus, SymbolEntry, UserDetails,
};

use crate::error::{ClientError, ClientResult};
use crate::request::lenient::{
    lenient_bool, lenient_i64, lenient_opt_i64, lenient_opt_string, lenient_string,
};

//=========================================================================================
// Auth
//=========================================================================================

#[derive(Deserialize)]
pub(crate) struct LoginPayload {
    #[serde(deserialize_with = "lenient_string")]
    user_id: String,
    token: String,
    #[serde(default, deserialize_with = "lenient_opt_i64")]
    expires_at: Option<i64>,
}

impl LoginPayload {
    pub(crate) fn to_domain(self) -> LoginGrant {
        LoginGrant {
            user_id: self.user_id,
            token: self.token,
            expires_at: self.expires_at.filter(|at| *at != 0),
        }
    }
}

#[derive(Deserialize)]
pub(crate) struct UserInfoPayload {
    #[serde(default, deserialize_with = "lenient_opt_string")]
    email: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl UserInfoPayload {
    /// Fails if the server left out `email`, the one field the details must carry.
    pub(crate) fn to_domain(self) -> ClientResult<UserDetails> {
        let email = self.email.ok_or_else(|| {
            ClientError::MalformedJson("user details are missing `email`".to_string())
        })?;
        let extra: BTreeMap<String, String> = self
            .extra
            .into_iter()
            .map(|(key, value)| match value {
                Value::String(s) => (key, s),
                other => (key, other.to_string()),
            })
            .collect();
        Ok(UserDetails { email, extra })
    }
}

//=========================================================================================
// Watch-list
//=========================================================================================

#[derive(Deserialize)]
pub(crate) struct SymbolPayload {
    symbol: String,
    #[serde(default, deserialize_with = "lenient_bool")]
    is_valid: bool,
    #[serde(default, deserialize_with = "lenient_i64")]
    create_ts: i64,
}

impl SymbolPayload {
    pub(crate) fn to_domain(self) -> SymbolEntry {
        SymbolEntry {
            symbol: self.symbol.to_lowercase(),
            is_valid: self.is_valid,
            created_at: timestamp_from_epoch(self.create_ts),
        }
    }
}

//=========================================================================================
// Backtest records
//=========================================================================================

#[derive(Deserialize)]
pub(crate) struct BacktestRecordPayload {
    #[serde(deserialize_with = "lenient_string")]
    id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    symbol: String,
    #[serde(default, deserialize_with = "lenient_string")]
    buy_price: String,
    #[serde(default, deserialize_with = "lenient_i64")]
    buy_ts: i64,
    #[serde(default, deserialize_with = "lenient_string")]
    sell_price: String,
    #[serde(default, deserialize_with = "lenient_i64")]
    sell_ts: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    hold_time: i64,
    #[serde(default, deserialize_with = "lenient_string")]
    profit_percent: String,
    #[serde(default, deserialize_with = "lenient_i64")]
    status: i64,
    #[serde(default, deserialize_with = "lenient_string")]
    status_text: String,
}

impl BacktestRecordPayload {
    fn to_domain(self) -> BacktestRecord {
        BacktestRecord {
            id: self.id,
            symbol: self.symbol,
            buy_price: self.buy_price,
            buy_at: timestamp_from_epoch(self.buy_ts),
            sell_price: self.sell_price,
            sell_at: timestamp_from_epoch(self.sell_ts),
            hold_time: self.hold_time,
            profit_percent: self.profit_percent,
            status: RecordStatus::from_code(self.status),
            status_text: self.status_text,
        }
    }
}

#[derive(Deserialize)]
pub(crate) struct PaginationPayload {
    #[serde(default, deserialize_with = "lenient_opt_i64")]
    current_page: Option<i64>,
    #[serde(default, deserialize_with = "lenient_opt_i64")]
    page_size: Option<i64>,
    #[serde(default, deserialize_with = "lenient_opt_i64")]
    total_count: Option<i64>,
    #[serde(default, deserialize_with = "lenient_opt_i64")]
    total_pages: Option<i64>,
}

/// A strictly positive value that fits a `u32`.
fn positive(value: Option<i64>) -> Option<u32> {
    value
        .and_then(|v| u32::try_from(v).ok())
        .filter(|v| *v > 0)
}

impl PaginationPayload {
    /// Missing or zero page and size fall back to what was requested. With a
    /// total count the page count is derived from it; otherwise the server's
    /// page count is kept as sent.
    fn to_domain(self, page: u32, page_size: u32) -> PaginationInfo {
        let current_page = positive(self.current_page).unwrap_or(page);
        let page_size = positive(self.page_size).unwrap_or(page_size);

        match self.total_count.and_then(|total| u64::try_from(total).ok()) {
            Some(total_count) => PaginationInfo::from_total(current_page, page_size, total_count),
            None => PaginationInfo {
                current_page,
                page_size,
                total_count: 0,
                total_pages: positive(self.total_pages).unwrap_or(0),
            },
        }
    }
}

#[derive(Deserialize)]
pub(crate) struct RecordListPayload {
    #[serde(default)]
    records: Option<Vec<BacktestRecordPayload>>,
    #[serde(default)]
    pagination: Option<PaginationPayload>,
}

impl RecordListPayload {
    /// Maps the payload, substituting an empty page for a payload without records.
    pub(crate) fn to_domain(payload: Option<Self>, page: u32, page_size: u32) -> BacktestPage {
        let Some(payload) = payload else {
            return BacktestPage::empty(page, page_size);
        };
        let Some(records) = payload.records else {
            return BacktestPage::empty(page, page_size);
        };
        BacktestPage {
            records: records
                .into_iter()
                .map(BacktestRecordPayload::to_domain)
                .collect(),
            pagination: payload
                .pagination
                .map(|pagination| pagination.to_domain(page, page_size))
                .unwrap_or_else(|| PaginationInfo::empty(page, page_size)),
        }
    }
}

#[derive(Deserialize, Default)]
pub(crate) struct BacktestDetailPayload {
    #[serde(default, deserialize_with = "lenient_opt_string")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    symbol: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    bid_curr_price: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    bid_price: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_i64")]
    bid_ts: Option<i64>,
    #[serde(default, deserialize_with = "lenient_opt_i64")]
    bid_plot_type: Option<i64>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    bid_plot_msg: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    buy_price: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_i64")]
    buy_ts: Option<i64>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    ask_curr_price: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    ask_price: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_i64")]
    ask_ts: Option<i64>,
    #[serde(default, deserialize_with = "lenient_opt_i64")]
    ask_plot_type: Option<i64>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    ask_plot_msg: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    sell_price: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_i64")]
    sell_ts: Option<i64>,
    #[serde(default, deserialize_with = "lenient_opt_i64")]
    hold_time: Option<i64>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    profit_percent: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_i64")]
    status: Option<i64>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    status_text: Option<String>,
}

impl BacktestDetailPayload {
    pub(crate) fn to_domain(self) -> BacktestDetail {
        let at = |ts: Option<i64>| ts.and_then(timestamp_from_epoch);
        BacktestDetail {
            id: self.id,
            symbol: self.symbol,
            bid_curr_price: self.bid_curr_price,
            bid_price: self.bid_price,
            bid_at: at(self.bid_ts),
            bid_plot_type: self.bid_plot_type,
            bid_plot_msg: self.bid_plot_msg,
            buy_price: self.buy_price,
            buy_at: at(self.buy_ts),
            ask_curr_price: self.ask_curr_price,
            ask_price: self.ask_price,
            ask_at: at(self.ask_ts),
            ask_plot_type: self.ask_plot_type,
            ask_plot_msg: self.ask_plot_msg,
            sell_price: self.sell_price,
            sell_at: at(self.sell_ts),
            hold_time: self.hold_time,
            profit_percent: self.profit_percent,
            status: self.status.map(RecordStatus::from_code),
            status_text: self.status_text,
        }
    }
}
