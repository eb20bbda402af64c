use super::MarketDataImportError;
use crate::workflows::negotiation::{
    Comparable, ComparablesProvider, MarketDataProvider, ProviderError,
};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

const BAND_STEPS: usize = 5;
const BAND_BEDROOMS: u32 = 2;

/// Listings loaded from a `zip_code,rent,bedrooms,address` CSV.
#[derive(Debug, Clone, Default)]
pub struct ComparablesRegistry {
    listings: Vec<ListingRow>,
    tolerance: f64,
}

#[derive(Debug, Clone, Deserialize)]
struct ListingRow {
    zip_code: String,
    rent: f64,
    #[serde(default)]
    bedrooms: u32,
    #[serde(default)]
    address: String,
}

impl ComparablesRegistry {
    pub fn from_path<P: AsRef<Path>>(path: P, tolerance: f64) -> Result<Self, MarketDataImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, tolerance)
    }

    pub fn from_reader<R: Read>(reader: R, tolerance: f64) -> Result<Self, MarketDataImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut listings = Vec::new();

        for row in csv_reader.deserialize::<ListingRow>() {
            let row = row?;
            if row.rent.is_finite() && row.rent > 0.0 {
                listings.push(row);
            }
        }

        Ok(Self {
            listings,
            tolerance: tolerance.abs(),
        })
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}

impl ComparablesProvider for ComparablesRegistry {
    /// Listings in the same ZIP code whose rent is within the tolerance band
    /// around `current_rent`.
    fn comparables(
        &self,
        zip_code: &str,
        current_rent: f64,
    ) -> Result<Vec<Comparable>, ProviderError> {
        let zip_code = zip_code.trim();
        let low = current_rent * (1.0 - self.tolerance);
        let high = current_rent * (1.0 + self.tolerance);

        Ok(self
            .listings
            .iter()
            .filter(|row| row.zip_code == zip_code)
            .filter(|row| row.rent >= low && row.rent <= high)
            .map(|row| Comparable {
                rent: row.rent,
                bedroom_count: row.bedrooms,
                address: row.address.clone(),
            })
            .collect())
    }
}

/// Estimates comparables from the market average when no listing feed exists:
/// five two-bedroom units spread 90%-110% of the average, kept within the
/// tolerance band.
pub struct MarketBandComparables<M> {
    market: Arc<M>,
    tolerance: f64,
}

impl<M> MarketBandComparables<M>
where
    M: MarketDataProvider,
{
    pub fn new(market: Arc<M>, tolerance: f64) -> Self {
        Self {
            market,
            tolerance: tolerance.abs(),
        }
    }
}

impl<M> ComparablesProvider for MarketBandComparables<M>
where
    M: MarketDataProvider,
{
    fn comparables(
        &self,
        zip_code: &str,
        _current_rent: f64,
    ) -> Result<Vec<Comparable>, ProviderError> {
        let Some(snapshot) = self.market.snapshot(zip_code)? else {
            return Ok(Vec::new());
        };

        let average_rent = snapshot.average_rent;
        if !average_rent.is_finite() || average_rent <= 0.0 {
            return Ok(Vec::new());
        }

        let low = average_rent * (1.0 - self.tolerance);
        let high = average_rent * (1.0 + self.tolerance);

        Ok((0..BAND_STEPS)
            .filter_map(|step| {
                let rent = average_rent * (0.9 + step as f64 * 0.05);
                (rent >= low && rent <= high).then(|| Comparable {
                    rent,
                    bedroom_count: BAND_BEDROOMS,
                    address: format!("Sample Address {}", step + 1),
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::market_data::StaticMarketData;
    use std::io::Cursor;

    const LISTINGS: &str = "zip_code,rent,bedrooms,address\n\
10001,2800,2,12 W 31st St\n\
10001,3100,2,40 W 29th St\n\
10001,4200,3,1 Penn Plaza\n\
10002,2900,1,88 Orchard St\n";

    #[test]
    fn registry_filters_by_zip_and_band() {
        let registry = ComparablesRegistry::from_reader(Cursor::new(LISTINGS), 0.2).expect("parse");
        assert_eq!(registry.len(), 4);

        let comps = registry.comparables("10001", 3000.0).expect("lookup");
        let rents: Vec<f64> = comps.iter().map(|comp| comp.rent).collect();
        assert_eq!(rents, vec![2800.0, 3100.0]);
        assert_eq!(comps[0].address, "12 W 31st St");
    }

    #[test]
    fn market_band_spreads_around_average() {
        let provider = MarketBandComparables::new(Arc::new(StaticMarketData::sample()), 0.2);
        let comps = provider.comparables("10001", 3300.0).expect("lookup");

        assert_eq!(comps.len(), 5);
        assert!(comps.iter().all(|comp| comp.bedroom_count == 2));
        assert!((comps[0].rent - 2700.0).abs() < 1e-9);
        assert!((comps[4].rent - 3300.0).abs() < 1e-9);
    }

    #[test]
    fn narrow_band_drops_outliers() {
        let provider = MarketBandComparables::new(Arc::new(StaticMarketData::sample()), 0.06);
        let comps = provider.comparables("10001", 3000.0).expect("lookup");
        assert_eq!(comps.len(), 3);
    }

    #[test]
    fn market_band_is_empty_without_market_data() {
        let provider = MarketBandComparables::new(Arc::new(StaticMarketData::new()), 0.2);
        assert!(provider.comparables("10001", 3000.0).expect("lookup").is_empty());
    }
}
