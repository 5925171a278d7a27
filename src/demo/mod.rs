//! Scripted stand-ins for the interactive product demos. Every result is
//! canned fixture data, optionally jittered by a seeded generator.

mod fixtures;

use std::time::Duration;

use futures::stream::{self, Stream, StreamExt};
use futures_timer::Delay;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;

use crate::i18n::Language;
use fixtures::TextAnalysisFixture;
pub use fixtures::{
    Entity, EntityKind, Kpis, MarketQuote, Product, Sentiment, TextAnalysisReport, Trend,
};

pub const MARKET_ANALYSIS_DELAY: Duration = Duration::from_millis(2000);
pub const DASHBOARD_REFRESH_DELAY: Duration = Duration::from_millis(1500);
pub const TEXT_ANALYSIS_DELAY: Duration = Duration::from_millis(2000);
pub const SCRAPE_ITEM_DELAY: Duration = Duration::from_millis(800);
pub const SCRAPE_FINISH_DELAY: Duration = Duration::from_millis(500);

const MARKET_PRICE_FLOOR: i64 = 999;

#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    #[error("demo fixture `{0}` is not embedded")]
    MissingFixture(&'static str),
    #[error("demo fixture `{name}` is invalid: {source}")]
    InvalidFixture {
        name: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum DemoKind {
    MarketAnalysis,
    ExecutiveDashboard,
    TextAnalysis,
    WebScraping,
}

impl DemoKind {
    pub const ALL: [DemoKind; 4] = [
        DemoKind::MarketAnalysis,
        DemoKind::ExecutiveDashboard,
        DemoKind::TextAnalysis,
        DemoKind::WebScraping,
    ];

    pub const fn label_key(self) -> &'static str {
        match self {
            DemoKind::MarketAnalysis => "demo.market_analysis",
            DemoKind::ExecutiveDashboard => "demo.executive_dashboard",
            DemoKind::TextAnalysis => "demo.text_analysis",
            DemoKind::WebScraping => "demo.web_scraping",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DemoFrame {
    /// Busy indicator on.
    Running,
    Market(Vec<MarketQuote>),
    Dashboard(Kpis),
    TextAnalysis(TextAnalysisReport),
    /// One more scraped row appended to the table.
    Product(Product),
    Finished,
}

#[derive(Clone, Debug)]
enum Payload {
    Market(Vec<MarketQuote>),
    Dashboard(Kpis),
    TextAnalysis(Option<TextAnalysisReport>),
    WebScraping(Vec<Product>),
}

/// One run of a demo. Replaying the same script with the same seed yields
/// the same frames.
#[derive(Clone, Debug)]
pub struct DemoScript {
    payload: Payload,
    seed: u64,
}

impl DemoScript {
    pub fn market_analysis() -> Result<Self, DemoError> {
        Ok(Self::from_payload(Payload::Market(fixtures::load("market.json")?)))
    }

    pub fn executive_dashboard() -> Result<Self, DemoError> {
        Ok(Self::from_payload(Payload::Dashboard(fixtures::load(
            "dashboard.json",
        )?)))
    }

    /// Blank input produces a script without frames.
    pub fn text_analysis(input: &str, language: Language) -> Result<Self, DemoError> {
        if input.trim().is_empty() {
            return Ok(Self::from_payload(Payload::TextAnalysis(None)));
        }
        let fixture: TextAnalysisFixture = fixtures::load("text_analysis.json")?;
        let report = TextAnalysisReport {
            entities: fixture.entities,
            sentiment: Sentiment {
                score: fixture.sentiment_score,
                label: fixture.sentiment_label.get(language).to_string(),
            },
            summary: fixture.summary.get(language).to_string(),
        };
        Ok(Self::from_payload(Payload::TextAnalysis(Some(report))))
    }

    pub fn web_scraping() -> Result<Self, DemoError> {
        Ok(Self::from_payload(Payload::WebScraping(fixtures::load(
            "scraping.json",
        )?)))
    }

    fn from_payload(payload: Payload) -> Self {
        Self {
            payload,
            seed: rand::random(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn kind(&self) -> DemoKind {
        match self.payload {
            Payload::Market(_) => DemoKind::MarketAnalysis,
            Payload::Dashboard(_) => DemoKind::ExecutiveDashboard,
            Payload::TextAnalysis(_) => DemoKind::TextAnalysis,
            Payload::WebScraping(_) => DemoKind::WebScraping,
        }
    }

    pub fn is_runnable(&self) -> bool {
        !matches!(self.payload, Payload::TextAnalysis(None))
    }

    /// Frames paired with the delay to wait before showing each one.
    pub fn frames(&self) -> DemoFrames {
        DemoFrames {
            payload: self.payload.clone(),
            rng: StdRng::seed_from_u64(self.seed),
            step: 0,
        }
    }

    pub fn total_duration(&self) -> Duration {
        self.frames().map(|(delay, _)| delay).sum()
    }

    /// Real-time playback of [`frames`](Self::frames).
    pub fn play(&self) -> impl Stream<Item = DemoFrame> + Send + 'static {
        tracing::debug!(kind = ?self.kind(), seed = self.seed, "demo playback started");
        stream::iter(self.frames()).then(|(delay, frame)| async move {
            if !delay.is_zero() {
                Delay::new(delay).await;
            }
            frame
        })
    }
}

pub struct DemoFrames {
    payload: Payload,
    rng: StdRng,
    step: usize,
}

impl Iterator for DemoFrames {
    type Item = (Duration, DemoFrame);

    fn next(&mut self) -> Option<Self::Item> {
        let step = self.step;
        self.step = self.step.saturating_add(1);

        match &self.payload {
            Payload::Market(quotes) => match step {
                0 => Some((Duration::ZERO, DemoFrame::Running)),
                1 => Some((
                    MARKET_ANALYSIS_DELAY,
                    DemoFrame::Market(jitter_market(quotes, &mut self.rng)),
                )),
                2 => Some((Duration::ZERO, DemoFrame::Finished)),
                _ => None,
            },
            Payload::Dashboard(kpis) => match step {
                0 => Some((Duration::ZERO, DemoFrame::Running)),
                1 => Some((
                    DASHBOARD_REFRESH_DELAY,
                    DemoFrame::Dashboard(jitter_kpis(kpis, &mut self.rng)),
                )),
                2 => Some((Duration::ZERO, DemoFrame::Finished)),
                _ => None,
            },
            Payload::TextAnalysis(None) => None,
            Payload::TextAnalysis(Some(report)) => match step {
                0 => Some((Duration::ZERO, DemoFrame::Running)),
                1 => Some((TEXT_ANALYSIS_DELAY, DemoFrame::TextAnalysis(report.clone()))),
                2 => Some((Duration::ZERO, DemoFrame::Finished)),
                _ => None,
            },
            Payload::WebScraping(products) => match step {
                0 => Some((Duration::ZERO, DemoFrame::Running)),
                n if n <= products.len() => Some((
                    SCRAPE_ITEM_DELAY,
                    DemoFrame::Product(products[n - 1].clone()),
                )),
                n if n == products.len() + 1 => Some((SCRAPE_FINISH_DELAY, DemoFrame::Finished)),
                _ => None,
            },
        }
    }
}

/// Moves competitor prices by up to ±25.00 (never below 999) and redraws
/// their change within ±2.5%.
fn jitter_market(quotes: &[MarketQuote], rng: &mut StdRng) -> Vec<MarketQuote> {
    let floor = Decimal::from(MARKET_PRICE_FLOOR);
    quotes
        .iter()
        .map(|quote| {
            if quote.own {
                return quote.clone();
            }
            let price = (quote.price + Decimal::new(rng.gen_range(-2500..=2500), 2)).max(floor);
            let change = Decimal::new(rng.gen_range(-250..=250), 2);
            MarketQuote {
                company: quote.company.clone(),
                price,
                change,
                trend: Trend::of(change),
                own: false,
            }
        })
        .collect()
}

fn jitter_kpis(kpis: &Kpis, rng: &mut StdRng) -> Kpis {
    Kpis {
        revenue: kpis.revenue + Decimal::from(rng.gen_range(-50_000i64..50_000)),
        growth: (kpis.growth + Decimal::new(rng.gen_range(-10..=10), 1)).max(Decimal::ZERO),
        customers: kpis.customers.saturating_add_signed(rng.gen_range(-10..10)),
        efficiency: (kpis.efficiency + Decimal::new(rng.gen_range(-5..=5), 1))
            .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED),
    }
}
