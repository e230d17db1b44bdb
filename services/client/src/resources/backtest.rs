//! services/client/src/resources/backtest.rs
//!
//! Paginated backtest record listing and single-record detail.

use signal_client_core::domain::{BacktestDetail, BacktestPage, RecordStatus};

use crate::error::ClientResult;
use crate::request::{ApiClient, RequestOptions};
use crate::resources::wire::{BacktestDetailPayload, RecordListPayload};

pub const RECORD_LIST_ENDPOINT: &str = "/api/plot/backtest/record/list";
pub const RECORD_DETAIL_ENDPOINT: &str = "/api/plot/backtest/record/detail";

/// Filters and paging for a record listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordQuery {
    pub page: u32,
    pub page_size: u32,
    pub symbol: Option<String>,
    pub status: Option<RecordStatus>,
}

impl RecordQuery {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page,
            page_size,
            symbol: None,
            status: None,
        }
    }

    pub fn symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    pub fn status(mut self, status: RecordStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// The same filters, pointed at another page.
    pub fn at_page(&self, page: u32) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }

    /// Query parameters in wire order. Blank symbols are left out.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("page".to_string(), self.page.to_string()),
            ("page_size".to_string(), self.page_size.to_string()),
        ];
        if let Some(symbol) = self.symbol.as_deref().map(str::trim) {
            if !symbol.is_empty() {
                params.push(("symbol".to_string(), symbol.to_string()));
            }
        }
        if let Some(status) = self.status {
            params.push(("status".to_string(), status.code().to_string()));
        }
        params
    }
}

impl ApiClient {
    /// Lists one page of backtest records.
    ///
    /// A response without records yields an empty page positioned at the
    /// requested page, not an error.
    pub async fn list_backtest_records(&self, query: &RecordQuery) -> ClientResult<BacktestPage> {
        let mut options = RequestOptions::get();
        options.query = query.to_params();

        let payload: Option<RecordListPayload> =
            self.send(RECORD_LIST_ENDPOINT, options, true).await?;
        Ok(RecordListPayload::to_domain(
            payload,
            query.page,
            query.page_size,
        ))
    }

    /// Fetches one record's detail. Missing data yields an empty detail.
    pub async fn get_backtest_detail(
        &self,
        symbol: &str,
        record_id: Option<&str>,
    ) -> ClientResult<BacktestDetail> {
        let mut options = RequestOptions::get().query("symbol", symbol);
        if let Some(id) = record_id.filter(|id| !id.is_empty()) {
            options = options.query("id", id);
        }

        let payload: Option<BacktestDetailPayload> =
            self.send(RECORD_DETAIL_ENDPOINT, options, true).await?;
        Ok(payload.unwrap_or_default().to_domain())
    }
}
