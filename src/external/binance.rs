use std::str::FromStr;

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::external::price_provider::{PriceProvider, PriceProviderError};
use crate::models::AssetPrice;

const DEFAULT_BASE_URL: &str = "https://api.binance.com";
/// All quotes go through the USDT pair; tickers are exposed without the suffix.
const QUOTE_SUFFIX: &str = "USDT";

pub struct BinanceProvider {
    client: reqwest::Client,
    base_url: String,
}

impl BinanceProvider {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn from_env() -> Self {
        let base_url =
            std::env::var("BINANCE_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    fn ticker_url(&self) -> String {
        format!("{}/api/v3/ticker/price", self.base_url)
    }
}

#[derive(Debug, Deserialize)]
struct TickerPrice {
    symbol: String,
    price: String,
}

#[async_trait]
impl PriceProvider for BinanceProvider {
    async fn fetch_price(&self, symbol: &str) -> Result<BigDecimal, PriceProviderError> {
        let pair = format!("{}{}", symbol.to_uppercase(), QUOTE_SUFFIX);
        debug!("Fetching price for {} from Binance", pair);

        let resp = self
            .client
            .get(self.ticker_url())
            .query(&[("symbol", pair.as_str())])
            .send()
            .await
            .map_err(|e| PriceProviderError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(PriceProviderError::BadResponse(format!(
                "Binance returned {} for {}",
                resp.status(),
                pair
            )));
        }

        let body: TickerPrice = resp
            .json()
            .await
            .map_err(|e| PriceProviderError::Parse(e.to_string()))?;

        BigDecimal::from_str(&body.price).map_err(|e| PriceProviderError::Parse(e.to_string()))
    }

    async fn fetch_all_prices(&self) -> Result<Vec<AssetPrice>, PriceProviderError> {
        let resp = self
            .client
            .get(self.ticker_url())
            .send()
            .await
            .map_err(|e| PriceProviderError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(PriceProviderError::BadResponse(format!(
                "Binance returned {}",
                resp.status()
            )));
        }

        let raw: Vec<TickerPrice> = resp
            .json()
            .await
            .map_err(|e| PriceProviderError::Parse(e.to_string()))?;

        let prices = raw
            .into_iter()
            .filter(|t| t.symbol.ends_with(QUOTE_SUFFIX))
            .filter_map(|t| {
                let symbol = t.symbol.trim_end_matches(QUOTE_SUFFIX).to_string();
                match BigDecimal::from_str(&t.price) {
                    Ok(price) => Some(AssetPrice { symbol, price }),
                    Err(e) => {
                        warn!("Skipping unparsable price for {}: {}", t.symbol, e);
                        None
                    }
                }
            })
            .collect();

        Ok(prices)
    }
}
