use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::bounds::{check_int_range, check_max_len, check_not_blank};
use crate::domain::decision::{MAX_CONVICTION, MIN_CONVICTION};
use crate::{
    CoreError, IsoDate, Recommendation, Ticker, ValidationError, ValidationErrors, Violations,
};

const MAX_SUMMARY_LEN: usize = 300;
const MAX_REASONING_LEN: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalystStatus {
    New,
    Ongoing,
}

/// The news or event behind a pick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CatalystBuilder")]
pub struct Catalyst {
    #[serde(rename = "type")]
    kind: String,
    summary: String,
    status: CatalystStatus,
    source_url: Url,
    date: IsoDate,
}

impl Catalyst {
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn status(&self) -> CatalystStatus {
        self.status
    }

    pub fn source_url(&self) -> &Url {
        &self.source_url
    }

    pub fn date(&self) -> IsoDate {
        self.date
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CatalystBuilder {
    #[serde(rename = "type")]
    pub kind: String,
    pub summary: String,
    pub status: CatalystStatus,
    pub source_url: String,
    pub date: IsoDate,
}

fn parse_source_url(raw: &str) -> Result<Url, ValidationError> {
    let invalid = || ValidationError::InvalidUrl {
        value: raw.to_owned(),
    };
    let url = Url::parse(raw.trim()).map_err(|_| invalid())?;
    match url.scheme() {
        "http" | "https" if url.has_host() => Ok(url),
        _ => Err(invalid()),
    }
}

impl CatalystBuilder {
    pub fn build(self) -> Result<Catalyst, ValidationErrors> {
        let mut violations = Violations::default();
        violations.check(check_not_blank("type", &self.kind));
        violations.check(check_not_blank("summary", &self.summary));
        violations.check(check_max_len("summary", &self.summary, MAX_SUMMARY_LEN));
        let source_url = violations.take(parse_source_url(&self.source_url));
        violations.finish()?;

        let Some(source_url) = source_url else {
            return Err(ValidationError::InvalidUrl {
                value: self.source_url,
            }
            .into());
        };

        Ok(Catalyst {
            kind: self.kind,
            summary: self.summary,
            status: self.status,
            source_url,
            date: self.date,
        })
    }
}

impl From<Catalyst> for CatalystBuilder {
    fn from(value: Catalyst) -> Self {
        Self {
            kind: value.kind,
            summary: value.summary,
            status: value.status,
            source_url: value.source_url.into(),
            date: value.date,
        }
    }
}

impl TryFrom<CatalystBuilder> for Catalyst {
    type Error = ValidationErrors;

    fn try_from(value: CatalystBuilder) -> Result<Self, Self::Error> {
        value.build()
    }
}

/// Trade candidate produced by the recommendation generator.
///
/// Only the structure is validated; the reasoning itself is taken as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PickBuilder")]
pub struct Pick {
    ticker: Ticker,
    recommendation: Recommendation,
    conviction_score: u8,
    catalyst: Catalyst,
    reasoning: String,
    as_of_date: IsoDate,
}

impl Pick {
    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    pub fn recommendation(&self) -> Recommendation {
        self.recommendation
    }

    pub fn conviction_score(&self) -> u8 {
        self.conviction_score
    }

    pub fn catalyst(&self) -> &Catalyst {
        &self.catalyst
    }

    pub fn reasoning(&self) -> &str {
        &self.reasoning
    }

    pub fn as_of_date(&self) -> IsoDate {
        self.as_of_date
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PickBuilder {
    pub ticker: String,
    pub recommendation: Recommendation,
    pub conviction_score: i64,
    pub catalyst: CatalystBuilder,
    pub reasoning: String,
    pub as_of_date: IsoDate,
}

impl PickBuilder {
    pub fn build(self) -> Result<Pick, ValidationErrors> {
        let mut violations = Violations::default();
        let ticker = violations.take(Ticker::parse(&self.ticker));
        if self.recommendation != Recommendation::Buy {
            violations.push(ValidationError::UnsupportedRecommendation {
                value: self.recommendation.to_string(),
            });
        }
        violations.check(check_int_range(
            "conviction_score",
            self.conviction_score,
            MIN_CONVICTION,
            MAX_CONVICTION,
        ));
        let catalyst = violations.absorb(self.catalyst.build());
        violations.check(check_max_len("reasoning", &self.reasoning, MAX_REASONING_LEN));
        violations.finish()?;

        match (ticker, catalyst, u8::try_from(self.conviction_score)) {
            (Some(ticker), Some(catalyst), Ok(conviction_score)) => Ok(Pick {
                ticker,
                recommendation: self.recommendation,
                conviction_score,
                catalyst,
                reasoning: self.reasoning,
                as_of_date: self.as_of_date,
            }),
            _ => Err(ValidationError::EmptyField { field: "pick" }.into()),
        }
    }
}

impl From<Pick> for PickBuilder {
    fn from(value: Pick) -> Self {
        Self {
            ticker: value.ticker.into(),
            recommendation: value.recommendation,
            conviction_score: i64::from(value.conviction_score),
            catalyst: value.catalyst.into(),
            reasoning: value.reasoning,
            as_of_date: value.as_of_date,
        }
    }
}

impl TryFrom<PickBuilder> for Pick {
    type Error = ValidationErrors;

    fn try_from(value: PickBuilder) -> Result<Self, Self::Error> {
        value.build()
    }
}

/// Ordered list of picks, exchanged as a JSON array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Picks(Vec<Pick>);

impl Picks {
    pub fn new(picks: Vec<Pick>) -> Self {
        Self(picks)
    }

    /// Parse a generator response, reporting which pick failed and why.
    pub fn parse_json(input: &str) -> Result<Self, CoreError> {
        let drafts: Vec<PickBuilder> = serde_json::from_str(input)?;
        drafts
            .into_iter()
            .enumerate()
            .map(|(index, draft)| {
                draft
                    .build()
                    .map_err(|errors| CoreError::InvalidPick { index, errors })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    pub fn as_slice(&self) -> &[Pick] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Pick> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Vec<Pick> {
        self.0
    }
}

impl<'a> IntoIterator for &'a Picks {
    type Item = &'a Pick;
    type IntoIter = std::slice::Iter<'a, Pick>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
