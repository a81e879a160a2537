//! Rule-based token outlook.
//!
//! Three independent threshold ladders (market cap, holder count, price)
//! each select one fixed phrase; the phrases are joined into a single
//! prediction message.

use super::token::{HolderSnapshot, TokenSnapshot};
use crate::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Market capitalization band, strongest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketCapTrend {
    VeryBullish,
    Bullish,
    Neutral,
    Bearish,
    VeryBearish,
}

impl MarketCapTrend {
    /// Upper bounds are inclusive: exactly 1e9 is `Bullish`.
    pub fn classify(market_cap: Decimal) -> Self {
        if market_cap > Decimal::from(1_000_000_000u64) {
            MarketCapTrend::VeryBullish
        } else if market_cap > Decimal::from(500_000_000u64) {
            MarketCapTrend::Bullish
        } else if market_cap > Decimal::from(100_000_000u64) {
            MarketCapTrend::Neutral
        } else if market_cap > Decimal::from(50_000_000u64) {
            MarketCapTrend::Bearish
        } else {
            MarketCapTrend::VeryBearish
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MarketCapTrend::VeryBullish => "very bullish",
            MarketCapTrend::Bullish => "bullish",
            MarketCapTrend::Neutral => "neutral",
            MarketCapTrend::Bearish => "bearish",
            MarketCapTrend::VeryBearish => "very bearish",
        }
    }
}

/// Community strength judged from the holder count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommunityTrend {
    VeryStrong,
    Stable,
    NeedsGrowth,
    HighRisk,
}

impl CommunityTrend {
    pub fn classify(holders_count: u64) -> Self {
        match holders_count {
            c if c > 100_000 => CommunityTrend::VeryStrong,
            50_000..=100_000 => CommunityTrend::Stable,
            10_000..=49_999 => CommunityTrend::NeedsGrowth,
            _ => CommunityTrend::HighRisk,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CommunityTrend::VeryStrong => "very strong community",
            CommunityTrend::Stable => "stable community",
            CommunityTrend::NeedsGrowth => "needs growth",
            CommunityTrend::HighRisk => "high risk, low holders",
        }
    }
}

/// Price level assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceTrend {
    High,
    Stable,
    Declining,
}

impl PriceTrend {
    /// Both 10 and 100 are `Stable`.
    pub fn classify(price: Decimal) -> Self {
        if price > Decimal::from(100) {
            PriceTrend::High
        } else if price >= Decimal::from(10) {
            PriceTrend::Stable
        } else {
            PriceTrend::Declining
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PriceTrend::High => "high, possible correction",
            PriceTrend::Stable => "stable",
            PriceTrend::Declining => "declining, may affect sentiment",
        }
    }
}

/// The three band classifications for one token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outlook {
    pub market: MarketCapTrend,
    pub community: CommunityTrend,
    pub price: PriceTrend,
}

impl Outlook {
    /// Separator placed between the three phrases of a prediction message.
    pub const SEPARATOR: &'static str = " | ";

    pub fn classify(market_cap: Decimal, holders_count: u64, price: Decimal) -> Self {
        Self {
            market: MarketCapTrend::classify(market_cap),
            community: CommunityTrend::classify(holders_count),
            price: PriceTrend::classify(price),
        }
    }

    /// The concatenated prediction message.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Outlook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{sep}{}{sep}{}",
            self.market.as_str(),
            self.community.as_str(),
            self.price.as_str(),
            sep = Self::SEPARATOR
        )
    }
}

/// Local prediction for a token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResult {
    pub address: String,
    pub symbol: String,
    pub market_cap: Decimal,
    pub holders_count: u64,
    pub price: Decimal,
    pub outlook: Outlook,
    pub prediction: String,
    pub computed_at: DateTime<Utc>,
}

impl PredictionResult {
    pub fn new(address: String, token: &TokenSnapshot, holders: HolderSnapshot) -> Self {
        let outlook = Outlook::classify(token.market_cap, holders.holders_count, token.price);

        Self {
            address,
            symbol: token.symbol.clone(),
            market_cap: token.market_cap,
            holders_count: holders.holders_count,
            price: token.price,
            prediction: outlook.message(),
            outlook,
            computed_at: Utc::now(),
        }
    }

    /// Decode raw metadata and holder responses and score them.
    #[allow(clippy::result_large_err)]
    pub fn analyze(address: &str, meta: &Value, holders: &Value) -> Result<Self> {
        let token = TokenSnapshot::from_meta(meta)?;
        let holders = HolderSnapshot::from_listing(holders);
        Ok(Self::new(address.to_string(), &token, holders))
    }
}
