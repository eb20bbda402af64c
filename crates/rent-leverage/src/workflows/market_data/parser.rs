use super::MarketDataImportError;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::io::Read;

const REGION_COLUMN: &str = "RegionName";

/// Monthly rent index observations for one metro.
#[derive(Debug)]
pub(crate) struct ZoriSeries {
    pub(crate) region: String,
    pub(crate) observations: BTreeMap<NaiveDate, f64>,
}

/// Parses a Zillow Observed Rent Index export: a `RegionName` column plus one
/// `YYYY-MM-DD` column per month. Blank or non-positive cells are skipped.
pub(crate) fn parse_series<R: Read>(reader: R) -> Result<Vec<ZoriSeries>, MarketDataImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let region_index = headers
        .iter()
        .position(|header| header.trim_start_matches('\u{feff}') == REGION_COLUMN)
        .ok_or(MarketDataImportError::MissingColumn(REGION_COLUMN))?;
    let date_columns: Vec<(usize, NaiveDate)> = headers
        .iter()
        .enumerate()
        .filter_map(|(index, header)| parse_month(header).map(|date| (index, date)))
        .collect();

    let mut series = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let region = record.get(region_index).unwrap_or_default().trim();
        if region.is_empty() {
            continue;
        }

        let observations: BTreeMap<NaiveDate, f64> = date_columns
            .iter()
            .filter_map(|(index, date)| {
                record
                    .get(*index)
                    .and_then(parse_rent)
                    .map(|value| (*date, value))
            })
            .collect();

        if observations.is_empty() {
            continue;
        }

        series.push(ZoriSeries {
            region: region.to_string(),
            observations,
        });
    }

    Ok(series)
}

fn parse_month(header: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(header.trim(), "%Y-%m-%d").ok()
}

fn parse_rent(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|rent| rent.is_finite() && *rent > 0.0)
}
