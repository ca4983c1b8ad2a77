use crate::dates::{add_days, days_between};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const MAX_RANGE_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Preset {
    #[serde(rename = "7d")]
    Days7,
    #[serde(rename = "14d")]
    Days14,
    #[serde(rename = "30d")]
    Days30,
    #[serde(rename = "custom")]
    Custom,
}

impl Preset {
    pub const SHORTCUTS: [Preset; 3] = [Preset::Days7, Preset::Days14, Preset::Days30];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "7d" => Some(Self::Days7),
            "14d" => Some(Self::Days14),
            "30d" => Some(Self::Days30),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Days7 => "7d",
            Self::Days14 => "14d",
            Self::Days30 => "30d",
            Self::Custom => "custom",
        }
    }

    /// Days subtracted from today to get the start of the preset.
    fn offset(self) -> Option<i64> {
        match self {
            Self::Days7 => Some(6),
            Self::Days14 => Some(13),
            Self::Days30 => Some(29),
            Self::Custom => None,
        }
    }
}

pub const SPAN_TOO_LONG: &str = "Range limited to 30 days";

/// Accepts `from..=to` when it is ordered and spans at most `MAX_RANGE_DAYS`.
pub fn check_span(from: NaiveDate, to: NaiveDate) -> Result<(), &'static str> {
    match days_between(from, to) {
        days if days < 0 => Err("from must not be after to"),
        days if days > MAX_RANGE_DAYS => Err(SPAN_TOO_LONG),
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeField {
    From,
    To,
}

impl RangeField {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "from" => Some(Self::From),
            "to" => Some(Self::To),
            _ => None,
        }
    }
}

/// The user-editable `from`/`to` pair of the range page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeSelection {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub preset: Preset,
    pub clamp_warning: bool,
}

impl RangeSelection {
    pub fn new(today: NaiveDate) -> Self {
        let mut selection = Self {
            from: today,
            to: today,
            preset: Preset::Days14,
            clamp_warning: false,
        };
        selection.apply_preset(Preset::Days14, today);
        selection
    }

    /// Forces exact preset boundaries ending today. `Custom` leaves the
    /// range untouched.
    pub fn apply_preset(&mut self, preset: Preset, today: NaiveDate) {
        let Some(offset) = preset.offset() else {
            return;
        };
        self.to = today;
        self.from = add_days(today, -offset);
        self.preset = preset;
        self.clamp_warning = false;
    }

    /// Applies a manual edit of one endpoint, snapping the other one when the
    /// range would turn negative and clamping spans over `MAX_RANGE_DAYS`.
    pub fn edit(&mut self, field: RangeField, value: NaiveDate) {
        let mut from = if field == RangeField::From { value } else { self.from };
        let mut to = if field == RangeField::To { value } else { self.to };

        if days_between(from, to) < 0 {
            match field {
                RangeField::From => to = from,
                RangeField::To => from = to,
            }
        }

        if days_between(from, to) > MAX_RANGE_DAYS {
            match field {
                RangeField::From => to = add_days(from, MAX_RANGE_DAYS),
                RangeField::To => from = add_days(to, -MAX_RANGE_DAYS),
            }
            self.clamp_warning = true;
        } else {
            self.clamp_warning = false;
        }

        self.from = from;
        self.to = to;
        self.preset = Preset::Custom;
    }

    pub fn day_count(&self) -> i64 {
        (days_between(self.from, self.to) + 1).max(1)
    }
}
