//! Static reference data for the quote estimator: the RAL classic color
//! chart offered for powder-coat finishes, and the filtering the chart
//! browser applies to it.

pub mod ral;

pub use ral::{POPULAR_CODES, RalCategory, RalChart, RalChartError, RalColor, RalFilter};
