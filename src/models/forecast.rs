//! Forecast period model and snow amount helpers

use super::resort::{GeoPoint, ResolvedResort};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One column of the forecast grid: a time slot on a day
///
/// Measurement values stay raw site text. Cells the page did not carry
/// (missing row, short row) are `None`; "no fresh snow" is the string `"0"`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ForecastPeriod {
    /// Calendar day, when the day header carried a machine-readable date
    pub date: Option<NaiveDate>,
    /// Time-of-day label as printed in the grid header (AM, PM, night)
    pub time_of_day: String,
    /// Expected snowfall text, usually centimetres
    pub snow: Option<String>,
    /// Freezing level text, usually metres
    pub freezing_level: Option<String>,
    /// Relative humidity text
    pub humidity: Option<String>,
    /// Wind speed text
    pub wind: Option<String>,
}

impl ForecastPeriod {
    /// Expected snowfall in centimetres, if the cell text is numeric
    #[must_use]
    pub fn snow_cm(&self) -> Option<f64> {
        self.snow.as_deref().and_then(parse_snow_amount)
    }
}

/// Full extracted forecast for one resolved resort
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ResortForecast {
    /// Directory display name of the resort
    pub resort: String,
    /// Country the resort was resolved under
    pub country: String,
    /// Resort coordinates, when the directory carried them
    pub geo: Option<GeoPoint>,
    /// Forecast periods in grid column order
    pub periods: Vec<ForecastPeriod>,
    /// When this forecast was scraped
    pub retrieved_at: DateTime<Utc>,
}

impl ResortForecast {
    /// Create a new forecast for a resolved resort
    #[must_use]
    pub fn new(resort: &ResolvedResort, periods: Vec<ForecastPeriod>) -> Self {
        Self {
            resort: resort.name.clone(),
            country: resort.country.clone(),
            geo: resort.geo,
            periods,
            retrieved_at: Utc::now(),
        }
    }

    /// Sum of the numeric snow cells across all periods, in centimetres
    ///
    /// Cells that do not parse (ranges, missing values) contribute nothing.
    #[must_use]
    pub fn total_snow_cm(&self) -> f64 {
        self.periods.iter().filter_map(ForecastPeriod::snow_cm).sum()
    }

    /// Distinct forecast days in grid order
    #[must_use]
    pub fn days(&self) -> Vec<NaiveDate> {
        let mut days = Vec::new();
        for period in &self.periods {
            if let Some(date) = period.date {
                if days.last() != Some(&date) {
                    days.push(date);
                }
            }
        }
        days
    }
}

/// Parse a snow cell into centimetres
///
/// Accepts plain numbers and numbers with a trailing `cm` unit. Anything
/// else (ranges like `5-10`, dashes, words) is not a number.
#[must_use]
pub fn parse_snow_amount(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let value = trimmed.strip_suffix("cm").unwrap_or(trimmed).trim();
    value.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn period(snow: Option<&str>) -> ForecastPeriod {
        ForecastPeriod {
            date: NaiveDate::from_ymd_opt(2026, 1, 9),
            time_of_day: "AM".to_string(),
            snow: snow.map(str::to_string),
            freezing_level: Some("2400".to_string()),
            humidity: Some("65".to_string()),
            wind: Some("15".to_string()),
        }
    }

    fn resolved() -> ResolvedResort {
        ResolvedResort {
            name: "Zermatt".to_string(),
            country: "Switzerland".to_string(),
            canonical_url: "/resorts/Zermatt".to_string(),
            data_url: "/resorts/Zermatt/forecasts/feed".to_string(),
            geo: Some(GeoPoint::new(46.0207, 7.7491)),
        }
    }

    #[rstest]
    #[case("0", Some(0.0))]
    #[case("3", Some(3.0))]
    #[case("2.5", Some(2.5))]
    #[case("12cm", Some(12.0))]
    #[case(" 7 cm ", Some(7.0))]
    #[case("5-10", None)]
    #[case("—", None)]
    #[case("", None)]
    #[case("heavy", None)]
    fn test_parse_snow_amount(#[case] raw: &str, #[case] expected: Option<f64>) {
        assert_eq!(parse_snow_amount(raw), expected);
    }

    #[test]
    fn test_total_snow_skips_unparseable_cells() {
        let forecast = ResortForecast::new(
            &resolved(),
            vec![
                period(Some("0")),
                period(Some("4")),
                period(Some("5-10")),
                period(None),
                period(Some("1.5")),
            ],
        );
        assert_eq!(forecast.total_snow_cm(), 5.5);
    }

    #[test]
    fn test_new_copies_resort_identity() {
        let forecast = ResortForecast::new(&resolved(), vec![period(Some("2"))]);
        assert_eq!(forecast.resort, "Zermatt");
        assert_eq!(forecast.country, "Switzerland");
        assert_eq!(forecast.geo, Some(GeoPoint::new(46.0207, 7.7491)));
        assert_eq!(forecast.periods.len(), 1);
    }

    #[test]
    fn test_days_deduplicates_consecutive_dates() {
        let friday = NaiveDate::from_ymd_opt(2026, 1, 9);
        let saturday = NaiveDate::from_ymd_opt(2026, 1, 10);
        let mut periods = Vec::new();
        for date in [friday, friday, friday, saturday, None, saturday] {
            let mut p = period(Some("0"));
            p.date = date;
            periods.push(p);
        }

        let forecast = ResortForecast::new(&resolved(), periods);
        assert_eq!(forecast.days(), vec![friday.unwrap(), saturday.unwrap()]);
    }
}
