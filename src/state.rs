use std::sync::Arc;

use crate::db::LedgerStore;
use crate::external::price_provider::PriceProvider;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn LedgerStore>,
    pub price_provider: Arc<dyn PriceProvider>,
}
