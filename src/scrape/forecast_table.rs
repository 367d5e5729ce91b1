//! Forecast grid extraction
//!
//! The forecast page carries one wide table: a day header row whose cells
//! span several columns, a time header row with one cell per column, and
//! one row per measurement. Alignment is purely positional, so each output
//! period is one column joined across rows by index.

use std::sync::LazyLock;

use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, error};

use super::{clean_text, selector};
use crate::models::ForecastPeriod;

/// Placeholder glyph the site renders for "no fresh snow"
const NO_SNOW_GLYPH: &str = "\u{2014}";

static FORECAST_TABLE: LazyLock<Selector> =
    LazyLock::new(|| selector("table.forecast-table__table"));
static TABLE_ROW: LazyLock<Selector> = LazyLock::new(|| selector("tr"));
static DAY_CELL: LazyLock<Selector> = LazyLock::new(|| selector("td.forecast-table-days__cell"));
static TIME_CELL: LazyLock<Selector> = LazyLock::new(|| selector("td.forecast-table__cell"));
static ANY_CELL: LazyLock<Selector> = LazyLock::new(|| selector("td"));

/// One measurement row of the grid, addressed by column index
///
/// A row the table does not carry and a row shorter than the header both
/// read as `None` for the affected columns.
#[derive(Debug, Clone, PartialEq)]
pub enum MeasurementRow {
    /// Row not present in the table at all
    Missing,
    /// Cell texts in column order
    Present(Vec<String>),
}

impl MeasurementRow {
    /// Value for the given column, if the row carried one
    #[must_use]
    pub fn value_at(&self, column: usize) -> Option<String> {
        match self {
            MeasurementRow::Missing => None,
            MeasurementRow::Present(cells) => cells.get(column).cloned(),
        }
    }
}

/// Extract forecast periods from a parsed resort forecast page
///
/// Returns `None` when the page has no forecast table at all. A table
/// without both header rows yields `Some` with zero periods; the time
/// header alone decides how many periods come out.
#[must_use]
pub fn extract(document: &Html) -> Option<Vec<ForecastPeriod>> {
    let Some(table) = document.select(&FORECAST_TABLE).next() else {
        error!("Forecast table not found in page");
        return None;
    };

    let days_row = find_row(table, "days");
    let time_row = find_row(table, "time");
    if days_row.is_none() {
        error!("Days row not found in forecast table");
    }
    if time_row.is_none() {
        error!("Time row not found in forecast table");
    }

    // Columns are only addressable with both header rows present
    let (dates, times) = match (days_row, time_row) {
        (Some(days), Some(time)) => (date_sequence(days), time_sequence(time)),
        _ => (Vec::new(), Vec::new()),
    };
    debug!(
        "Aligned {} day columns against {} time slots",
        dates.len(),
        times.len()
    );

    let snow = normalize_snow(measurement_row(table, "snow"));
    let freezing_level = measurement_row(table, "freezing-level");
    let humidity = measurement_row(table, "humidity");
    let wind = measurement_row(table, "wind");

    let mut periods = Vec::with_capacity(times.len());
    for (column, time_of_day) in times.into_iter().enumerate() {
        periods.push(ForecastPeriod {
            date: dates.get(column).copied().flatten(),
            time_of_day,
            snow: snow.value_at(column),
            freezing_level: freezing_level.value_at(column),
            humidity: humidity.value_at(column),
            wind: wind.value_at(column),
        });
    }

    Some(periods)
}

fn find_row<'a>(table: ElementRef<'a>, role: &str) -> Option<ElementRef<'a>> {
    table
        .select(&TABLE_ROW)
        .find(|row| row.value().attr("data-row") == Some(role))
}

/// Expand the day header into one date per column using cell spans
fn date_sequence(days_row: ElementRef<'_>) -> Vec<Option<NaiveDate>> {
    let mut dates = Vec::new();
    for cell in days_row.select(&DAY_CELL) {
        let date = cell
            .value()
            .attr("data-date")
            .and_then(|raw| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok());
        let span = cell
            .value()
            .attr("colspan")
            .and_then(|raw| raw.parse::<usize>().ok())
            .unwrap_or(1);
        for _ in 0..span {
            dates.push(date);
        }
    }
    dates
}

/// Time header cells in column order; their count fixes the period count
fn time_sequence(time_row: ElementRef<'_>) -> Vec<String> {
    time_row.select(&TIME_CELL).map(element_text).collect()
}

fn measurement_row(table: ElementRef<'_>, role: &str) -> MeasurementRow {
    match find_row(table, role) {
        Some(row) => MeasurementRow::Present(row.select(&ANY_CELL).map(element_text).collect()),
        None => {
            debug!("No {role} row in forecast table, values default to null");
            MeasurementRow::Missing
        }
    }
}

/// The snow row renders an em dash for "no fresh snow"; read it as zero.
/// Other rows keep the dash as-is.
fn normalize_snow(row: MeasurementRow) -> MeasurementRow {
    match row {
        MeasurementRow::Present(cells) => MeasurementRow::Present(
            cells
                .into_iter()
                .map(|cell| {
                    if cell == NO_SNOW_GLYPH {
                        "0".to_string()
                    } else {
                        cell
                    }
                })
                .collect(),
        ),
        MeasurementRow::Missing => MeasurementRow::Missing,
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    clean_text(&element.text().collect::<String>())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(table_rows: &str) -> Html {
        Html::parse_document(&format!(
            "<html><body><table class=\"forecast-table__table\"><tbody>{table_rows}</tbody></table></body></html>"
        ))
    }

    fn two_day_header() -> String {
        concat!(
            "<tr data-row=\"days\">",
            "<td class=\"forecast-table-days__cell\" data-date=\"2026-01-09\" colspan=\"3\">Fri 09</td>",
            "<td class=\"forecast-table-days__cell\" data-date=\"2026-01-10\" colspan=\"3\">Sat 10</td>",
            "</tr>",
            "<tr data-row=\"time\">",
            "<td class=\"forecast-table__cell\">AM</td>",
            "<td class=\"forecast-table__cell\">PM</td>",
            "<td class=\"forecast-table__cell\">night</td>",
            "<td class=\"forecast-table__cell\">AM</td>",
            "<td class=\"forecast-table__cell\">PM</td>",
            "<td class=\"forecast-table__cell\">night</td>",
            "</tr>",
        )
        .to_string()
    }

    fn full_page() -> Html {
        let rows = two_day_header()
            + "<tr data-row=\"snow\"><td>\u{2014}</td><td>3</td><td>6</td><td>\u{2014}</td><td>2</td><td>\u{2014}</td></tr>"
            + "<tr data-row=\"freezing-level\"><td>2400</td><td>2550</td><td>2300</td><td>2250</td><td>2400</td><td>2350</td></tr>"
            + "<tr data-row=\"humidity\"><td>65</td><td>70</td><td>85</td><td>90</td><td>75</td><td>60</td></tr>"
            + "<tr data-row=\"wind\"><td>10</td><td>15</td><td>25</td><td>30</td><td>20</td><td>10</td></tr>";
        page(&rows)
    }

    #[test]
    fn test_one_period_per_time_slot() {
        let periods = extract(&full_page()).unwrap();
        assert_eq!(periods.len(), 6);

        let first = &periods[0];
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2026, 1, 9));
        assert_eq!(first.time_of_day, "AM");
        assert_eq!(first.snow.as_deref(), Some("0"));
        assert_eq!(first.freezing_level.as_deref(), Some("2400"));
        assert_eq!(first.humidity.as_deref(), Some("65"));
        assert_eq!(first.wind.as_deref(), Some("10"));
    }

    #[test]
    fn test_dates_broadcast_across_spanned_columns() {
        let periods = extract(&full_page()).unwrap();
        let friday = NaiveDate::from_ymd_opt(2026, 1, 9);
        let saturday = NaiveDate::from_ymd_opt(2026, 1, 10);
        let dates: Vec<_> = periods.iter().map(|p| p.date).collect();
        assert_eq!(
            dates,
            vec![friday, friday, friday, saturday, saturday, saturday]
        );
    }

    #[test]
    fn test_em_dash_reads_as_zero_snow_only() {
        let rows = two_day_header()
            + "<tr data-row=\"snow\"><td>\u{2014}</td><td>1</td><td>\u{2014}</td><td>2</td><td>3</td><td>4</td></tr>"
            + "<tr data-row=\"wind\"><td>\u{2014}</td><td>5</td><td>5</td><td>5</td><td>5</td><td>5</td></tr>";
        let periods = extract(&page(&rows)).unwrap();

        assert_eq!(periods[0].snow.as_deref(), Some("0"));
        assert_eq!(periods[2].snow.as_deref(), Some("0"));
        // The same glyph in another measurement row is plain text
        assert_eq!(periods[0].wind.as_deref(), Some("\u{2014}"));
    }

    #[test]
    fn test_no_forecast_table_yields_none() {
        let document = Html::parse_document("<html><body><p>maintenance</p></body></html>");
        assert_eq!(extract(&document), None);
    }

    #[test]
    fn test_missing_time_row_yields_zero_periods() {
        let rows = concat!(
            "<tr data-row=\"days\">",
            "<td class=\"forecast-table-days__cell\" data-date=\"2026-01-09\" colspan=\"3\">Fri</td>",
            "</tr>",
            "<tr data-row=\"snow\"><td>1</td><td>2</td><td>3</td></tr>",
        );
        let periods = extract(&page(rows)).unwrap();
        assert!(periods.is_empty());
    }

    #[test]
    fn test_missing_days_row_yields_zero_periods() {
        let rows = concat!(
            "<tr data-row=\"time\">",
            "<td class=\"forecast-table__cell\">AM</td>",
            "</tr>",
            "<tr data-row=\"snow\"><td>1</td></tr>",
        );
        let periods = extract(&page(rows)).unwrap();
        assert!(periods.is_empty());
    }

    #[test]
    fn test_missing_measurement_row_degrades_to_none() {
        let rows = two_day_header()
            + "<tr data-row=\"snow\"><td>1</td><td>2</td><td>3</td><td>4</td><td>5</td><td>6</td></tr>";
        let periods = extract(&page(&rows)).unwrap();

        assert_eq!(periods.len(), 6);
        assert_eq!(periods[0].snow.as_deref(), Some("1"));
        assert!(periods.iter().all(|p| p.wind.is_none()));
        assert!(periods.iter().all(|p| p.freezing_level.is_none()));
        assert!(periods.iter().all(|p| p.humidity.is_none()));
    }

    #[test]
    fn test_short_measurement_row_pads_with_none() {
        let rows = two_day_header() + "<tr data-row=\"snow\"><td>1</td><td>2</td></tr>";
        let periods = extract(&page(&rows)).unwrap();

        assert_eq!(periods.len(), 6);
        assert_eq!(periods[0].snow.as_deref(), Some("1"));
        assert_eq!(periods[1].snow.as_deref(), Some("2"));
        assert!(periods[2].snow.is_none());
        assert!(periods[5].snow.is_none());
    }

    #[test]
    fn test_day_header_shorter_than_time_header() {
        let rows = concat!(
            "<tr data-row=\"days\">",
            "<td class=\"forecast-table-days__cell\" data-date=\"2026-01-09\" colspan=\"2\">Fri</td>",
            "</tr>",
            "<tr data-row=\"time\">",
            "<td class=\"forecast-table__cell\">AM</td>",
            "<td class=\"forecast-table__cell\">PM</td>",
            "<td class=\"forecast-table__cell\">night</td>",
            "</tr>",
        );
        let periods = extract(&page(rows)).unwrap();

        assert_eq!(periods.len(), 3);
        assert!(periods[0].date.is_some());
        assert!(periods[1].date.is_some());
        assert!(periods[2].date.is_none());
    }

    #[test]
    fn test_unparseable_data_date_stays_null() {
        let rows = concat!(
            "<tr data-row=\"days\">",
            "<td class=\"forecast-table-days__cell\" data-date=\"soon\" colspan=\"1\">Fri</td>",
            "</tr>",
            "<tr data-row=\"time\">",
            "<td class=\"forecast-table__cell\">AM</td>",
            "</tr>",
            "<tr data-row=\"snow\"><td>4</td></tr>",
        );
        let periods = extract(&page(rows)).unwrap();

        assert_eq!(periods.len(), 1);
        assert!(periods[0].date.is_none());
        assert_eq!(periods[0].snow.as_deref(), Some("4"));
    }

    #[test]
    fn test_two_day_spans_cover_three_time_slots() {
        let rows = concat!(
            "<tr data-row=\"days\">",
            "<td class=\"forecast-table-days__cell\" data-date=\"2026-01-09\" colspan=\"2\">Fri</td>",
            "<td class=\"forecast-table-days__cell\" data-date=\"2026-01-10\" colspan=\"1\">Sat</td>",
            "</tr>",
            "<tr data-row=\"time\">",
            "<td class=\"forecast-table__cell\">PM</td>",
            "<td class=\"forecast-table__cell\">night</td>",
            "<td class=\"forecast-table__cell\">AM</td>",
            "</tr>",
        );
        let periods = extract(&page(rows)).unwrap();

        let friday = NaiveDate::from_ymd_opt(2026, 1, 9);
        let saturday = NaiveDate::from_ymd_opt(2026, 1, 10);
        let dates: Vec<_> = periods.iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![friday, friday, saturday]);
    }

    #[test]
    fn test_day_cell_without_colspan_counts_once() {
        let rows = concat!(
            "<tr data-row=\"days\">",
            "<td class=\"forecast-table-days__cell\" data-date=\"2026-01-09\">Fri</td>",
            "<td class=\"forecast-table-days__cell\" data-date=\"2026-01-10\">Sat</td>",
            "</tr>",
            "<tr data-row=\"time\">",
            "<td class=\"forecast-table__cell\">AM</td>",
            "<td class=\"forecast-table__cell\">AM</td>",
            "</tr>",
        );
        let periods = extract(&page(rows)).unwrap();

        assert_eq!(periods.len(), 2);
        assert_eq!(periods[0].date, NaiveDate::from_ymd_opt(2026, 1, 9));
        assert_eq!(periods[1].date, NaiveDate::from_ymd_opt(2026, 1, 10));
    }

    #[test]
    fn test_cell_text_is_whitespace_cleaned() {
        let rows = two_day_header()
            + "<tr data-row=\"freezing-level\"><td>\n  2400\n  <span>m</span>\n</td><td>2500</td><td>2500</td><td>2500</td><td>2500</td><td>2500</td></tr>";
        let periods = extract(&page(&rows)).unwrap();
        assert_eq!(periods[0].freezing_level.as_deref(), Some("2400 m"));
    }

    #[test]
    fn test_value_at_out_of_range() {
        let row = MeasurementRow::Present(vec!["a".to_string()]);
        assert_eq!(row.value_at(0).as_deref(), Some("a"));
        assert_eq!(row.value_at(1), None);
        assert_eq!(MeasurementRow::Missing.value_at(0), None);
    }
}
