use crate::dates::{date_key, days_in_range};
use crate::models::{EnergyLevels, SpendingSlice};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Physical,
    Mental,
    Emotional,
}

impl Dimension {
    pub const ALL: [Dimension; 3] = [Dimension::Physical, Dimension::Mental, Dimension::Emotional];

    pub fn label(self) -> &'static str {
        match self {
            Self::Physical => "Physical",
            Self::Mental => "Mental",
            Self::Emotional => "Emotional",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Self::Physical => "#c4826d",
            Self::Mental => "#7eb8b3",
            Self::Emotional => "#8fa58b",
        }
    }
}

/// One calendar day of the trend chart. `None` means nothing was recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartPoint {
    pub date: String,
    pub physical: Option<i64>,
    pub mental: Option<i64>,
    pub emotional: Option<i64>,
}

impl ChartPoint {
    pub fn value(&self, dimension: Dimension) -> Option<i64> {
        match dimension {
            Dimension::Physical => self.physical,
            Dimension::Mental => self.mental,
            Dimension::Emotional => self.emotional,
        }
    }
}

/// Left-joins sparse entries onto every day of `from..=to`.
pub fn build_chart_data(levels: &[EnergyLevels], from: NaiveDate, to: NaiveDate) -> Vec<ChartPoint> {
    let by_date: HashMap<&str, &EnergyLevels> = levels
        .iter()
        .map(|level| (level.date.as_str(), level))
        .collect();

    days_in_range(from, to)
        .into_iter()
        .map(|day| {
            let date = date_key(day);
            let entry = by_date.get(date.as_str());
            ChartPoint {
                physical: entry.map(|level| level.physical),
                mental: entry.map(|level| level.mental),
                emotional: entry.map(|level| level.emotional),
                date,
            }
        })
        .collect()
}

/// Labels to skip between x-axis ticks.
pub fn tick_interval(point_count: usize, compact: bool) -> usize {
    if point_count == 0 {
        return 0;
    }
    let target_ticks = if compact { 4 } else { 7 };
    point_count.div_ceil(target_ticks).saturating_sub(1)
}

const DEFAULT_COLORS: [&str; 8] = [
    "#e8a445", "#8fa58b", "#c4826d", "#7eb8b3", "#d4a574", "#9b8aa6", "#c9a87c", "#a8b5a0",
];

pub fn category_color(name: &str, index: usize) -> &'static str {
    match name {
        "Travail" => "#e8a445",
        "Perso" => "#8fa58b",
        "Routine" => "#c4826d",
        "Repas" => "#7eb8b3",
        "Sport" => "#d4a574",
        "Sommeil" => "#9b8aa6",
        _ => DEFAULT_COLORS[index % DEFAULT_COLORS.len()],
    }
}

pub fn total_hours(slices: &[SpendingSlice]) -> f64 {
    slices.iter().map(|slice| slice.hours).sum()
}
