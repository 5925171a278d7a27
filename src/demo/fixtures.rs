use rust_decimal::Decimal;
use rust_embed::RustEmbed;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::DemoError;
use crate::i18n::Language;

#[derive(RustEmbed)]
#[folder = "assets/demos/"]
struct DemoAssets;

pub(super) fn load<T: DeserializeOwned>(name: &'static str) -> Result<T, DemoError> {
    let file = DemoAssets::get(name).ok_or(DemoError::MissingFixture(name))?;
    serde_json::from_slice(&file.data).map_err(|source| DemoError::InvalidFixture { name, source })
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Neutral,
}

impl Trend {
    pub fn of(change: Decimal) -> Self {
        match change.cmp(&Decimal::ZERO) {
            std::cmp::Ordering::Greater => Trend::Up,
            std::cmp::Ordering::Less => Trend::Down,
            std::cmp::Ordering::Equal => Trend::Neutral,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MarketQuote {
    pub company: String,
    pub price: Decimal,
    /// Percent change since the previous run.
    pub change: Decimal,
    pub trend: Trend,
    /// The visitor's own company stays fixed across runs.
    #[serde(default)]
    pub own: bool,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Kpis {
    pub revenue: Decimal,
    pub growth: Decimal,
    pub customers: u32,
    pub efficiency: Decimal,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Company,
    Money,
    Date,
    Percentage,
    Location,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub kind: EntityKind,
    pub text: String,
    pub confidence: f32,
}

#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
pub(super) struct Localized {
    es: String,
    en: String,
}

impl Localized {
    pub(super) fn get(&self, language: Language) -> &str {
        match language {
            Language::Es => &self.es,
            Language::En => &self.en,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub(super) struct TextAnalysisFixture {
    pub(super) entities: Vec<Entity>,
    pub(super) sentiment_score: f32,
    pub(super) sentiment_label: Localized,
    pub(super) summary: Localized,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Sentiment {
    pub score: f32,
    pub label: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TextAnalysisReport {
    pub entities: Vec<Entity>,
    pub sentiment: Sentiment,
    pub summary: String,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u32,
    pub name: String,
    pub price: Decimal,
    pub stock: u32,
    pub rating: Decimal,
}
