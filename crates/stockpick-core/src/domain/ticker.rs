use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

const MAX_TICKER_LEN: usize = 10;

/// Exchange ticker as it appears in picks, orders and broker listings.
///
/// Surrounding whitespace is trimmed and ASCII letters are upper-cased. The
/// result is 1-10 characters and a single token.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ticker(String);

/// Characters that would split a ticker when it is used as an order symbol
/// or a `TICKER=PATH` key.
fn breaks_token(ch: char) -> bool {
    ch.is_whitespace() || ch.is_control() || ch == '='
}

impl Ticker {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let token = input.trim();
        match token.chars().count() {
            0 => Err(ValidationError::EmptyTicker),
            len if len > MAX_TICKER_LEN => Err(ValidationError::TickerTooLong {
                len,
                max: MAX_TICKER_LEN,
            }),
            _ => match token.chars().enumerate().find(|(_, ch)| breaks_token(*ch)) {
                Some((index, ch)) => Err(ValidationError::TickerInvalidChar { ch, index }),
                None => Ok(Self(token.to_ascii_uppercase())),
            },
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Ticker {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Ticker {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Ticker> for String {
    fn from(value: Ticker) -> Self {
        value.0
    }
}
