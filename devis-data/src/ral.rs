//! The RAL classic color chart offered for powder-coat finishes.
//!
//! The chart ships as a CSV asset and is filtered the way the website's
//! color browser does: by category, by a case-insensitive search over code
//! and name, and optionally restricted to the most-ordered references.

use std::io::Read;
use std::sync::OnceLock;

use serde::Deserialize;
use thiserror::Error;

/// The embedded RAL classic chart data.
const RAL_CLASSIC_CSV: &str = include_str!("../data/ral_classic.csv");

/// The eight references customers order most often.
pub const POPULAR_CODES: [&str; 8] = [
    "RAL 7016", "RAL 9010", "RAL 9005", "RAL 7035", "RAL 9016", "RAL 7021", "RAL 3020",
    "RAL 5015",
];

/// Errors raised while loading or interpreting chart data.
#[derive(Debug, Error)]
pub enum RalChartError {
    /// A CSV row could not be read or deserialized.
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    /// A hex color value is not `#RRGGBB`.
    #[error("invalid hex color '{0}'")]
    InvalidHex(String),
}

impl From<csv::Error> for RalChartError {
    fn from(err: csv::Error) -> Self {
        RalChartError::CsvParse(err.to_string())
    }
}

/// Color family groupings used by the chart browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum RalCategory {
    Blancs,
    Gris,
    Noirs,
    Bleus,
    Verts,
    Oranges,
    Rouges,
    Jaunes,
    Bruns,
}

impl RalCategory {
    pub const ALL: [RalCategory; 9] = [
        Self::Blancs,
        Self::Gris,
        Self::Noirs,
        Self::Bleus,
        Self::Verts,
        Self::Oranges,
        Self::Rouges,
        Self::Jaunes,
        Self::Bruns,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blancs => "Blancs",
            Self::Gris => "Gris",
            Self::Noirs => "Noirs",
            Self::Bleus => "Bleus",
            Self::Verts => "Verts",
            Self::Oranges => "Oranges",
            Self::Rouges => "Rouges",
            Self::Jaunes => "Jaunes",
            Self::Bruns => "Bruns",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Blancs" => Some(Self::Blancs),
            "Gris" => Some(Self::Gris),
            "Noirs" => Some(Self::Noirs),
            "Bleus" => Some(Self::Bleus),
            "Verts" => Some(Self::Verts),
            "Oranges" => Some(Self::Oranges),
            "Rouges" => Some(Self::Rouges),
            "Jaunes" => Some(Self::Jaunes),
            "Bruns" => Some(Self::Bruns),
            _ => None,
        }
    }
}

/// One RAL reference.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RalColor {
    pub code: String,
    pub name: String,
    pub hex: String,
    pub category: RalCategory,
}

impl RalColor {
    /// Whether this is one of the most-ordered references.
    pub fn is_popular(&self) -> bool {
        POPULAR_CODES.contains(&self.code.as_str())
    }

    /// Relative luminance of the swatch (ITU-R 601 luma, 0.0 to 1.0).
    pub fn luminance(&self) -> Result<f64, RalChartError> {
        let digits = self
            .hex
            .strip_prefix('#')
            .filter(|d| d.len() == 6 && d.is_ascii())
            .ok_or_else(|| RalChartError::InvalidHex(self.hex.clone()))?;
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| RalChartError::InvalidHex(self.hex.clone()))
        };
        let r = f64::from(channel(0..2)?);
        let g = f64::from(channel(2..4)?);
        let b = f64::from(channel(4..6)?);
        Ok((0.299 * r + 0.587 * g + 0.114 * b) / 255.0)
    }

    /// Whether the swatch is light enough to need a dark label on top.
    pub fn is_light(&self) -> Result<bool, RalChartError> {
        Ok(self.luminance()? > 0.5)
    }
}

/// Criteria for narrowing the chart. All criteria are conjunctive; the
/// default filter matches every color.
#[derive(Debug, Clone, Default)]
pub struct RalFilter {
    /// Restrict to one category, or `None` for all ("Tous").
    pub category: Option<RalCategory>,
    /// Case-insensitive substring matched against code and name.
    pub search: String,
    /// Restrict to [`POPULAR_CODES`].
    pub popular_only: bool,
}

impl RalFilter {
    fn matches(&self, color: &RalColor) -> bool {
        if let Some(category) = self.category {
            if color.category != category {
                return false;
            }
        }
        if !self.search.is_empty() {
            let needle = self.search.to_lowercase();
            if !color.code.to_lowercase().contains(&needle)
                && !color.name.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        !self.popular_only || color.is_popular()
    }
}

/// The full chart, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RalChart {
    colors: Vec<RalColor>,
}

impl RalChart {
    /// Parses chart records from CSV.
    ///
    /// The reader can be any `Read`, such as a file or a string slice.
    /// Rows must carry `code,name,hex,category` with a known category.
    pub fn parse<R: Read>(reader: R) -> Result<Self, RalChartError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut colors = Vec::new();
        for result in csv_reader.deserialize() {
            let color: RalColor = result?;
            colors.push(color);
        }
        Ok(Self { colors })
    }

    /// The chart embedded in the crate.
    ///
    /// Parsed once on first use; the asset is validated by the crate's
    /// tests, so a parse failure here means a corrupted build.
    pub fn builtin() -> &'static RalChart {
        static CHART: OnceLock<RalChart> = OnceLock::new();
        CHART.get_or_init(|| {
            RalChart::parse(RAL_CLASSIC_CSV.as_bytes())
                .expect("embedded RAL chart parses")
        })
    }

    pub fn colors(&self) -> &[RalColor] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Looks a color up by its exact code.
    pub fn by_code(&self, code: &str) -> Option<&RalColor> {
        self.colors.iter().find(|c| c.code == code)
    }

    /// Colors matching the filter, in chart order.
    pub fn filter(&self, filter: &RalFilter) -> Vec<&RalColor> {
        self.colors.iter().filter(|c| filter.matches(c)).collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const SAMPLE_CSV: &str = "\
code,name,hex,category
RAL 9010,Blanc pur,#FFFFFF,Blancs
RAL 7016,Gris anthracite,#373F43,Gris
RAL 9005,Noir foncé,#0A0A0D,Noirs
";

    #[test]
    fn parse_reads_records_in_order() {
        let chart = RalChart::parse(SAMPLE_CSV.as_bytes()).unwrap();

        assert_eq!(chart.len(), 3);
        assert_eq!(chart.colors()[0].code, "RAL 9010");
        assert_eq!(chart.colors()[1].category, RalCategory::Gris);
    }

    #[test]
    fn parse_rejects_unknown_category() {
        let bad = "code,name,hex,category\nRAL 4005,Lilas bleu,#83639D,Violets\n";

        let result = RalChart::parse(bad.as_bytes());

        assert!(matches!(result, Err(RalChartError::CsvParse(_))));
    }

    #[test]
    fn search_is_case_insensitive_over_code_and_name() {
        let chart = RalChart::parse(SAMPLE_CSV.as_bytes()).unwrap();

        let by_name = chart.filter(&RalFilter {
            search: "ANTHRACITE".to_string(),
            ..RalFilter::default()
        });
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].code, "RAL 7016");

        let by_code = chart.filter(&RalFilter {
            search: "9010".to_string(),
            ..RalFilter::default()
        });
        assert_eq!(by_code.len(), 1);
    }

    #[test]
    fn category_and_popular_criteria_are_conjunctive() {
        let chart = RalChart::parse(SAMPLE_CSV.as_bytes()).unwrap();

        let filtered = chart.filter(&RalFilter {
            category: Some(RalCategory::Blancs),
            popular_only: true,
            ..RalFilter::default()
        });

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].code, "RAL 9010");
    }

    #[test]
    fn luminance_separates_light_and_dark_swatches() {
        let chart = RalChart::parse(SAMPLE_CSV.as_bytes()).unwrap();

        assert!(chart.by_code("RAL 9010").unwrap().is_light().unwrap());
        assert!(!chart.by_code("RAL 9005").unwrap().is_light().unwrap());
    }

    #[test]
    fn luminance_rejects_malformed_hex() {
        let color = RalColor {
            code: "RAL 0000".to_string(),
            name: "Inconnu".to_string(),
            hex: "373F43".to_string(),
            category: RalCategory::Gris,
        };

        assert!(matches!(
            color.luminance(),
            Err(RalChartError::InvalidHex(_))
        ));
    }
}
