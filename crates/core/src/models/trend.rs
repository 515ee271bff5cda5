use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

/// First column of a trend row: a calendar date, or the grand-total marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrendLabel {
    Date(NaiveDate),
    Total,
}

impl TrendLabel {
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            TrendLabel::Date(d) => Some(*d),
            TrendLabel::Total => None,
        }
    }

    pub fn is_total(&self) -> bool {
        matches!(self, TrendLabel::Total)
    }
}

/// Display form used by the table: `02 Jan 2024` or `Total`.
impl std::fmt::Display for TrendLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrendLabel::Date(d) => write!(f, "{}", d.format("%d %b %Y")),
            TrendLabel::Total => write!(f, "Total"),
        }
    }
}

impl Serialize for TrendLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TrendLabel::Date(d) => serializer.collect_str(&d.format("%Y-%m-%d")),
            TrendLabel::Total => serializer.serialize_str("Total"),
        }
    }
}

/// One date's combined figures (or the grand total).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendRow {
    #[serde(rename = "date")]
    pub label: TrendLabel,
    pub profit: Decimal,
    pub expense: Decimal,
    pub investment: Decimal,
}

impl TrendRow {
    pub fn new(label: TrendLabel, profit: Decimal, expense: Decimal, investment: Decimal) -> Self {
        Self {
            label,
            profit,
            expense,
            investment,
        }
    }
}

/// Ordered trend rows: newest date first, `Total` last. Empty when there
/// was no activity at all.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TrendTable {
    rows: Vec<TrendRow>,
}

impl TrendTable {
    pub(crate) fn from_rows(rows: Vec<TrendRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[TrendRow] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<TrendRow> {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows excluding the trailing total.
    pub fn date_rows(&self) -> &[TrendRow] {
        match self.rows.split_last() {
            Some((last, rest)) if last.label.is_total() => rest,
            _ => &self.rows,
        }
    }

    pub fn total(&self) -> Option<&TrendRow> {
        self.rows.last().filter(|r| r.label.is_total())
    }

    /// `date,profit,expense,investment` with ISO dates and a final `Total` line.
    pub fn to_csv(&self) -> String {
        let mut csv = String::from("date,profit,expense,investment\n");
        for row in &self.rows {
            let label = match row.label {
                TrendLabel::Date(d) => d.format("%Y-%m-%d").to_string(),
                TrendLabel::Total => "Total".to_string(),
            };
            csv.push_str(&format!(
                "{},{},{},{}\n",
                label, row.profit, row.expense, row.investment
            ));
        }
        csv
    }
}
