use serde::{Deserialize, Serialize};

use crate::domain::bounds::{check_int_range, check_not_blank, Bound};
use crate::{IsoDate, ValidationErrors, Violations};

/// Direction of the recent price action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceTrend {
    Uptrend,
    Downtrend,
    Sideways,
    #[default]
    Unknown,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTolerance {
    Conservative,
    #[default]
    Moderate,
    Aggressive,
}

fn check_entries(violations: &mut Violations, field: &'static str, entries: &[String]) {
    for entry in entries {
        violations.check(check_not_blank(field, entry));
    }
}

/// Upcoming events that could move the stock.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CatalystsBuilder")]
pub struct Catalysts {
    next_earnings_date: Option<IsoDate>,
    guidance_watch_items: Vec<String>,
    fda_or_clinical: Vec<String>,
    product_launches_or_contracts: Vec<String>,
    regulatory_or_legal: Vec<String>,
    activism_mna: Vec<String>,
}

impl Catalysts {
    pub fn next_earnings_date(&self) -> Option<IsoDate> {
        self.next_earnings_date
    }

    pub fn guidance_watch_items(&self) -> &[String] {
        &self.guidance_watch_items
    }

    pub fn fda_or_clinical(&self) -> &[String] {
        &self.fda_or_clinical
    }

    pub fn product_launches_or_contracts(&self) -> &[String] {
        &self.product_launches_or_contracts
    }

    pub fn regulatory_or_legal(&self) -> &[String] {
        &self.regulatory_or_legal
    }

    pub fn activism_mna(&self) -> &[String] {
        &self.activism_mna
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CatalystsBuilder {
    pub next_earnings_date: Option<IsoDate>,
    pub guidance_watch_items: Vec<String>,
    pub fda_or_clinical: Vec<String>,
    pub product_launches_or_contracts: Vec<String>,
    pub regulatory_or_legal: Vec<String>,
    pub activism_mna: Vec<String>,
}

impl CatalystsBuilder {
    pub fn build(self) -> Result<Catalysts, ValidationErrors> {
        let mut violations = Violations::default();
        check_entries(&mut violations, "guidance_watch_items", &self.guidance_watch_items);
        check_entries(&mut violations, "fda_or_clinical", &self.fda_or_clinical);
        check_entries(
            &mut violations,
            "product_launches_or_contracts",
            &self.product_launches_or_contracts,
        );
        check_entries(&mut violations, "regulatory_or_legal", &self.regulatory_or_legal);
        check_entries(&mut violations, "activism_mna", &self.activism_mna);
        violations.finish()?;

        Ok(Catalysts {
            next_earnings_date: self.next_earnings_date,
            guidance_watch_items: self.guidance_watch_items,
            fda_or_clinical: self.fda_or_clinical,
            product_launches_or_contracts: self.product_launches_or_contracts,
            regulatory_or_legal: self.regulatory_or_legal,
            activism_mna: self.activism_mna,
        })
    }
}

impl From<Catalysts> for CatalystsBuilder {
    fn from(value: Catalysts) -> Self {
        Self {
            next_earnings_date: value.next_earnings_date,
            guidance_watch_items: value.guidance_watch_items,
            fda_or_clinical: value.fda_or_clinical,
            product_launches_or_contracts: value.product_launches_or_contracts,
            regulatory_or_legal: value.regulatory_or_legal,
            activism_mna: value.activism_mna,
        }
    }
}

impl TryFrom<CatalystsBuilder> for Catalysts {
    type Error = ValidationErrors;

    fn try_from(value: CatalystsBuilder) -> Result<Self, Self::Error> {
        value.build()
    }
}

/// Price/volume picture of the stock.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TechnicalsBuilder")]
pub struct Technicals {
    price_trend: PriceTrend,
    support_levels: Vec<f64>,
    resistance_levels: Vec<f64>,
    avg_daily_dollar_volume_musd: Option<f64>,
    short_interest_pct_float: Option<f64>,
    beta_1y: Option<f64>,
    recent_move_2w_pct: Option<f64>,
    relative_strength_note: Option<String>,
}

impl Technicals {
    pub fn price_trend(&self) -> PriceTrend {
        self.price_trend
    }

    pub fn support_levels(&self) -> &[f64] {
        &self.support_levels
    }

    pub fn resistance_levels(&self) -> &[f64] {
        &self.resistance_levels
    }

    pub fn avg_daily_dollar_volume_musd(&self) -> Option<f64> {
        self.avg_daily_dollar_volume_musd
    }

    pub fn short_interest_pct_float(&self) -> Option<f64> {
        self.short_interest_pct_float
    }

    pub fn beta_1y(&self) -> Option<f64> {
        self.beta_1y
    }

    pub fn recent_move_2w_pct(&self) -> Option<f64> {
        self.recent_move_2w_pct
    }

    pub fn relative_strength_note(&self) -> Option<&str> {
        self.relative_strength_note.as_deref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TechnicalsBuilder {
    pub price_trend: PriceTrend,
    pub support_levels: Vec<f64>,
    pub resistance_levels: Vec<f64>,
    pub avg_daily_dollar_volume_musd: Option<f64>,
    pub short_interest_pct_float: Option<f64>,
    pub beta_1y: Option<f64>,
    pub recent_move_2w_pct: Option<f64>,
    pub relative_strength_note: Option<String>,
}

impl TechnicalsBuilder {
    pub fn build(self) -> Result<Technicals, ValidationErrors> {
        let mut violations = Violations::default();
        for level in &self.support_levels {
            violations.check(Bound::NON_NEGATIVE.check("support_levels", *level));
        }
        for level in &self.resistance_levels {
            violations.check(Bound::NON_NEGATIVE.check("resistance_levels", *level));
        }
        violations.check(Bound::NON_NEGATIVE.check_optional(
            "avg_daily_dollar_volume_musd",
            self.avg_daily_dollar_volume_musd,
        ));
        violations.check(
            Bound::PERCENT.check_optional("short_interest_pct_float", self.short_interest_pct_float),
        );
        violations.check(Bound::BETA.check_optional("beta_1y", self.beta_1y));
        violations.check(
            Bound::GROWTH_PCT.check_optional("recent_move_2w_pct", self.recent_move_2w_pct),
        );
        violations.finish()?;

        Ok(Technicals {
            price_trend: self.price_trend,
            support_levels: self.support_levels,
            resistance_levels: self.resistance_levels,
            avg_daily_dollar_volume_musd: self.avg_daily_dollar_volume_musd,
            short_interest_pct_float: self.short_interest_pct_float,
            beta_1y: self.beta_1y,
            recent_move_2w_pct: self.recent_move_2w_pct,
            relative_strength_note: self.relative_strength_note,
        })
    }
}

impl From<Technicals> for TechnicalsBuilder {
    fn from(value: Technicals) -> Self {
        Self {
            price_trend: value.price_trend,
            support_levels: value.support_levels,
            resistance_levels: value.resistance_levels,
            avg_daily_dollar_volume_musd: value.avg_daily_dollar_volume_musd,
            short_interest_pct_float: value.short_interest_pct_float,
            beta_1y: value.beta_1y,
            recent_move_2w_pct: value.recent_move_2w_pct,
            relative_strength_note: value.relative_strength_note,
        }
    }
}

impl TryFrom<TechnicalsBuilder> for Technicals {
    type Error = ValidationErrors;

    fn try_from(value: TechnicalsBuilder) -> Result<Self, Self::Error> {
        value.build()
    }
}

/// Sector and macro backdrop.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MacroSectorBuilder")]
pub struct MacroSector {
    sector: Option<String>,
    sector_in_favor: Option<bool>,
    competitor_perf_note: Option<String>,
    macro_risks: Vec<String>,
}

impl MacroSector {
    pub fn sector(&self) -> Option<&str> {
        self.sector.as_deref()
    }

    pub fn sector_in_favor(&self) -> Option<bool> {
        self.sector_in_favor
    }

    pub fn competitor_perf_note(&self) -> Option<&str> {
        self.competitor_perf_note.as_deref()
    }

    pub fn macro_risks(&self) -> &[String] {
        &self.macro_risks
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MacroSectorBuilder {
    pub sector: Option<String>,
    pub sector_in_favor: Option<bool>,
    pub competitor_perf_note: Option<String>,
    pub macro_risks: Vec<String>,
}

impl MacroSectorBuilder {
    pub fn build(self) -> Result<MacroSector, ValidationErrors> {
        let mut violations = Violations::default();
        if let Some(sector) = &self.sector {
            violations.check(check_not_blank("sector", sector));
        }
        check_entries(&mut violations, "macro_risks", &self.macro_risks);
        violations.finish()?;

        Ok(MacroSector {
            sector: self.sector,
            sector_in_favor: self.sector_in_favor,
            competitor_perf_note: self.competitor_perf_note,
            macro_risks: self.macro_risks,
        })
    }
}

impl From<MacroSector> for MacroSectorBuilder {
    fn from(value: MacroSector) -> Self {
        Self {
            sector: value.sector,
            sector_in_favor: value.sector_in_favor,
            competitor_perf_note: value.competitor_perf_note,
            macro_risks: value.macro_risks,
        }
    }
}

impl TryFrom<MacroSectorBuilder> for MacroSector {
    type Error = ValidationErrors;

    fn try_from(value: MacroSectorBuilder) -> Result<Self, Self::Error> {
        value.build()
    }
}

const DEFAULT_TIME_HORIZON_DAYS: u32 = 30;

/// How the position fits the holder's risk budget. Exit levels are percentages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PersonalFitBuilder")]
pub struct PersonalFit {
    risk_tolerance: RiskTolerance,
    time_horizon_days: u32,
    position_size_pct_of_portfolio: Option<f64>,
    liquidity_needs_note: Option<String>,
    stop_loss_pct: Option<f64>,
    profit_target_pct: Option<f64>,
}

impl Default for PersonalFit {
    fn default() -> Self {
        Self {
            risk_tolerance: RiskTolerance::default(),
            time_horizon_days: DEFAULT_TIME_HORIZON_DAYS,
            position_size_pct_of_portfolio: None,
            liquidity_needs_note: None,
            stop_loss_pct: None,
            profit_target_pct: None,
        }
    }
}

impl PersonalFit {
    pub fn risk_tolerance(&self) -> RiskTolerance {
        self.risk_tolerance
    }

    pub fn time_horizon_days(&self) -> u32 {
        self.time_horizon_days
    }

    pub fn position_size_pct_of_portfolio(&self) -> Option<f64> {
        self.position_size_pct_of_portfolio
    }

    pub fn liquidity_needs_note(&self) -> Option<&str> {
        self.liquidity_needs_note.as_deref()
    }

    pub fn stop_loss_pct(&self) -> Option<f64> {
        self.stop_loss_pct
    }

    pub fn profit_target_pct(&self) -> Option<f64> {
        self.profit_target_pct
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PersonalFitBuilder {
    pub risk_tolerance: RiskTolerance,
    pub time_horizon_days: i64,
    pub position_size_pct_of_portfolio: Option<f64>,
    pub liquidity_needs_note: Option<String>,
    pub stop_loss_pct: Option<f64>,
    pub profit_target_pct: Option<f64>,
}

impl Default for PersonalFitBuilder {
    fn default() -> Self {
        PersonalFit::default().into()
    }
}

impl PersonalFitBuilder {
    pub fn build(self) -> Result<PersonalFit, ValidationErrors> {
        let mut violations = Violations::default();
        violations.check(check_int_range(
            "time_horizon_days",
            self.time_horizon_days,
            1,
            i64::from(u32::MAX),
        ));
        violations.check(Bound::PERCENT.check_optional(
            "position_size_pct_of_portfolio",
            self.position_size_pct_of_portfolio,
        ));
        violations.check(Bound::PERCENT.check_optional("stop_loss_pct", self.stop_loss_pct));
        violations.check(
            Bound::PROFIT_TARGET_PCT.check_optional("profit_target_pct", self.profit_target_pct),
        );
        violations.finish()?;

        Ok(PersonalFit {
            risk_tolerance: self.risk_tolerance,
            time_horizon_days: u32::try_from(self.time_horizon_days)
                .unwrap_or(DEFAULT_TIME_HORIZON_DAYS),
            position_size_pct_of_portfolio: self.position_size_pct_of_portfolio,
            liquidity_needs_note: self.liquidity_needs_note,
            stop_loss_pct: self.stop_loss_pct,
            profit_target_pct: self.profit_target_pct,
        })
    }
}

impl From<PersonalFit> for PersonalFitBuilder {
    fn from(value: PersonalFit) -> Self {
        Self {
            risk_tolerance: value.risk_tolerance,
            time_horizon_days: i64::from(value.time_horizon_days),
            position_size_pct_of_portfolio: value.position_size_pct_of_portfolio,
            liquidity_needs_note: value.liquidity_needs_note,
            stop_loss_pct: value.stop_loss_pct,
            profit_target_pct: value.profit_target_pct,
        }
    }
}

impl TryFrom<PersonalFitBuilder> for PersonalFit {
    type Error = ValidationErrors;

    fn try_from(value: PersonalFitBuilder) -> Result<Self, Self::Error> {
        value.build()
    }
}
