//! Company overview and stock metrics
//!
//! Market data comes from an external source and may be partial or
//! missing entirely. Every metric is derived only when its inputs exist;
//! nothing here fails.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Snapshot of a ticker's fundamentals, named after the upstream feed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickerInfo {
    pub full_time_employees: Option<u64>,
    pub total_revenue: Option<f64>,
    pub profit_margins: Option<f64>,
    pub operating_margins: Option<f64>,
    pub shares_outstanding: Option<f64>,
    pub dividend_rate: Option<f64>,
    pub enterprise_value: Option<f64>,
    pub total_cash: Option<f64>,
    pub first_trade_date_epoch_utc: Option<i64>,
}

/// One daily OHLCV bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Read-only market data lookup
pub trait MarketDataSource: Send + Sync {
    fn ticker_info(&self, ticker: &str) -> Option<TickerInfo>;

    /// Bars with `start <= date <= end`, oldest first
    fn history(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Vec<DailyBar>;
}

/// Cached snapshots under `<data_dir>/market/`
#[derive(Debug, Clone)]
pub struct FileMarketData {
    dir: PathBuf,
}

impl FileMarketData {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            dir: data_dir.as_ref().join("market"),
        }
    }

    fn read<T: serde::de::DeserializeOwned>(&self, file: String) -> Option<T> {
        let path = self.dir.join(file);
        let content = fs::read_to_string(&path)
            .map_err(|e| debug!("No market data at {:?}: {}", path, e))
            .ok()?;
        serde_json::from_str(&content)
            .map_err(|e| warn!("Ignoring malformed market data {:?}: {}", path, e))
            .ok()
    }
}

impl MarketDataSource for FileMarketData {
    fn ticker_info(&self, ticker: &str) -> Option<TickerInfo> {
        self.read(format!("{}_info.json", ticker.to_lowercase()))
    }

    fn history(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Vec<DailyBar> {
        let mut bars: Vec<DailyBar> = self
            .read(format!("{}_history.json", ticker.to_lowercase()))
            .unwrap_or_default();
        bars.retain(|b| b.date >= start && b.date <= end);
        bars.sort_by_key(|b| b.date);
        bars
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub label: &'static str,
    pub value: String,
}

impl Metric {
    fn new(label: &'static str, value: String) -> Self {
        Self { label, value }
    }
}

/// The three metric groups of the company overview
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CompanyOverview {
    pub structure: Vec<Metric>,
    pub financial: Vec<Metric>,
    pub shareholder: Vec<Metric>,
}

impl CompanyOverview {
    /// `executive_count` is `None` when the company has no executive data
    pub fn derive(info: &TickerInfo, executive_count: Option<usize>, today: NaiveDate) -> Self {
        let execs = executive_count.filter(|n| *n > 0);
        let employees = info.full_time_employees.filter(|n| *n > 0);
        let mut overview = CompanyOverview::default();

        if let Some(first_trade) = info
            .first_trade_date_epoch_utc
            .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0))
        {
            let years = today.year() - first_trade.year();
            overview.structure.push(Metric::new("Years Public", years.to_string()));
        }
        if let Some(n) = execs {
            overview
                .structure
                .push(Metric::new("Number of Executives", n.to_string()));
        }
        if let Some(n) = employees {
            overview
                .structure
                .push(Metric::new("Total Employees", group_thousands(n as f64, 0)));
        }
        if let (Some(n), Some(emp)) = (execs, employees) {
            let ratio = n as f64 / emp as f64 * 100.0;
            overview
                .structure
                .push(Metric::new("Executive Ratio", format!("{:.2}%", ratio)));
        }

        if let Some(revenue) = info.total_revenue {
            overview
                .financial
                .push(Metric::new("Annual Revenue", format_large_number(revenue)));
        }
        if let Some(margin) = info.profit_margins {
            overview
                .financial
                .push(Metric::new("Profit Margin", format!("{:.2}%", margin * 100.0)));
        }
        if let Some(margin) = info.operating_margins {
            overview
                .financial
                .push(Metric::new("Operating Margin", format!("{:.2}%", margin * 100.0)));
        }
        if let (Some(revenue), Some(emp)) = (info.total_revenue, employees) {
            overview.financial.push(Metric::new(
                "Revenue/Employee",
                format_large_number(revenue / emp as f64),
            ));
        }

        if let Some(shares) = info.shares_outstanding {
            overview
                .shareholder
                .push(Metric::new("Outstanding Shares", format_large_number(shares)));
        }
        if let Some(dividend) = info.dividend_rate {
            overview
                .shareholder
                .push(Metric::new("Annual Dividend", format!("${:.2}", dividend)));
        }
        if let Some(ev) = info.enterprise_value {
            overview
                .shareholder
                .push(Metric::new("Enterprise Value", format_large_number(ev)));
        }
        if let (Some(cash), Some(n)) = (info.total_cash, execs) {
            overview.shareholder.push(Metric::new(
                "Avg Exec Comp",
                format_large_number(cash / n as f64),
            ));
        }

        overview
    }

    pub fn is_empty(&self) -> bool {
        self.structure.is_empty() && self.financial.is_empty() && self.shareholder.is_empty()
    }
}

/// Headline figures for a price history
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockSummary {
    pub current_price: f64,
    /// Absolute and percent change against the previous bar
    pub daily_change: Option<(f64, f64)>,
    pub period_high: f64,
    pub period_low: f64,
}

impl StockSummary {
    pub fn from_bars(bars: &[DailyBar]) -> Option<Self> {
        let last = bars.last()?;
        let daily_change = match bars {
            [.., prev, _] if prev.close != 0.0 => {
                let change = last.close - prev.close;
                Some((change, change / prev.close * 100.0))
            }
            _ => None,
        };
        let period_high = bars.iter().map(|b| b.high).fold(f64::MIN, f64::max);
        let period_low = bars.iter().map(|b| b.low).fold(f64::MAX, f64::min);

        Some(Self {
            current_price: last.close,
            daily_change,
            period_high,
            period_low,
        })
    }
}

/// `$1.5B`, `$12.0M`, `$3.4K`, or `$999.99` below one thousand
pub fn format_large_number(num: f64) -> String {
    if num >= 1e9 {
        format!("${:.1}B", num / 1e9)
    } else if num >= 1e6 {
        format!("${:.1}M", num / 1e6)
    } else if num >= 1e3 {
        format!("${:.1}K", num / 1e3)
    } else {
        format!("${}", group_thousands(num, 2))
    }
}

fn group_thousands(num: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, num.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if num < 0.0 { "-" } else { "" };
    match frac_part {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn bar(d: u32, close: f64) -> DailyBar {
        DailyBar {
            date: day(d),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1000,
        }
    }

    #[test]
    fn test_format_large_number() {
        assert_eq!(format_large_number(2_500_000_000.0), "$2.5B");
        assert_eq!(format_large_number(12_000_000.0), "$12.0M");
        assert_eq!(format_large_number(3_400.0), "$3.4K");
        assert_eq!(format_large_number(999.5), "$999.50");
        assert_eq!(format_large_number(-1_234_567.0), "$-1,234,567.00");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(164_000.0, 0), "164,000");
        assert_eq!(group_thousands(1_000_000.0, 0), "1,000,000");
        assert_eq!(group_thousands(12.0, 0), "12");
    }

    #[test]
    fn test_overview_full() {
        let info = TickerInfo {
            full_time_employees: Some(1000),
            total_revenue: Some(5_000_000_000.0),
            profit_margins: Some(0.2512),
            operating_margins: Some(0.3),
            shares_outstanding: Some(2_000_000.0),
            dividend_rate: Some(1.5),
            enterprise_value: Some(7_000_000_000.0),
            total_cash: Some(50_000_000.0),
            first_trade_date_epoch_utc: Some(946_684_800), // 2000-01-01
        };

        let overview = CompanyOverview::derive(&info, Some(10), day(1));
        let structure: Vec<(&str, &str)> = overview
            .structure
            .iter()
            .map(|m| (m.label, m.value.as_str()))
            .collect();
        assert_eq!(
            structure,
            vec![
                ("Years Public", "24"),
                ("Number of Executives", "10"),
                ("Total Employees", "1,000"),
                ("Executive Ratio", "1.00%"),
            ]
        );
        assert_eq!(overview.financial[1].value, "25.12%");
        assert_eq!(overview.financial[3].value, "$5.0M");
        assert_eq!(overview.shareholder[3].value, "$5.0M");
    }

    #[test]
    fn test_overview_omits_missing_inputs() {
        let info = TickerInfo {
            total_revenue: Some(100.0),
            ..Default::default()
        };
        let overview = CompanyOverview::derive(&info, None, day(1));
        assert!(overview.structure.is_empty());
        assert_eq!(overview.financial.len(), 1);
        assert!(overview.shareholder.is_empty());

        assert!(CompanyOverview::derive(&TickerInfo::default(), None, day(1)).is_empty());
    }

    #[test]
    fn test_stock_summary() {
        assert!(StockSummary::from_bars(&[]).is_none());

        let single = StockSummary::from_bars(&[bar(1, 10.0)]).unwrap();
        assert_eq!(single.daily_change, None);

        let summary = StockSummary::from_bars(&[bar(1, 10.0), bar(2, 20.0), bar(3, 25.0)]).unwrap();
        assert_eq!(summary.current_price, 25.0);
        assert_eq!(summary.daily_change, Some((5.0, 25.0)));
        assert_eq!(summary.period_high, 26.0);
        assert_eq!(summary.period_low, 9.0);
    }

    #[test]
    fn test_file_market_data() {
        let temp_dir = TempDir::new().unwrap();
        let market_dir = temp_dir.path().join("market");
        fs::create_dir_all(&market_dir).unwrap();
        fs::write(
            market_dir.join("acme_info.json"),
            r#"{"fullTimeEmployees": 250, "totalRevenue": 1.0e8}"#,
        )
        .unwrap();
        fs::write(
            market_dir.join("acme_history.json"),
            serde_json::to_string(&vec![bar(3, 12.0), bar(1, 10.0), bar(2, 11.0)]).unwrap(),
        )
        .unwrap();

        let source = FileMarketData::new(temp_dir.path());
        let info = source.ticker_info("ACME").unwrap();
        assert_eq!(info.full_time_employees, Some(250));

        let bars = source.history("ACME", day(2), day(3));
        let dates: Vec<NaiveDate> = bars.iter().map(|b| b.date).collect();
        assert_eq!(dates, vec![day(2), day(3)]);

        assert!(source.ticker_info("NONE").is_none());
        assert!(source.history("NONE", day(1), day(3)).is_empty());
    }
}
