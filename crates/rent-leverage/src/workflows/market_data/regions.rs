pub const DEFAULT_FALLBACK_REGION: &str = "New York, NY";

const STANDARD_METROS: [(&str, &str); 12] = [
    ("10001", "New York, NY"),
    ("90001", "Los Angeles, CA"),
    ("60601", "Chicago, IL"),
    ("75001", "Dallas, TX"),
    ("77001", "Houston, TX"),
    ("20001", "Washington, DC"),
    ("19101", "Philadelphia, PA"),
    ("33101", "Miami, FL"),
    ("30301", "Atlanta, GA"),
    ("02101", "Boston, MA"),
    ("85001", "Phoenix, AZ"),
    ("94101", "San Francisco, CA"),
];

/// Maps ZIP codes to metro region names by their three-digit prefix.
#[derive(Debug, Clone)]
pub struct RegionDirectory {
    prefixes: Vec<(String, String)>,
    fallback: Option<String>,
}

impl RegionDirectory {
    /// Twelve seeded metros with New York as the fallback region.
    pub fn standard() -> Self {
        Self {
            prefixes: STANDARD_METROS
                .iter()
                .map(|(zip, metro)| (zip[..3].to_string(), metro.to_string()))
                .collect(),
            fallback: Some(DEFAULT_FALLBACK_REGION.to_string()),
        }
    }

    pub fn with_fallback(mut self, fallback: Option<String>) -> Self {
        self.fallback = fallback.filter(|region| !region.trim().is_empty());
        self
    }

    pub fn with_prefix(mut self, zip_prefix: impl Into<String>, metro: impl Into<String>) -> Self {
        self.prefixes.push((zip_prefix.into(), metro.into()));
        self
    }

    /// The metro whose prefix the ZIP code starts with, first match wins.
    pub fn metro_for(&self, zip_code: &str) -> Option<&str> {
        let zip_code = zip_code.trim();
        self.prefixes
            .iter()
            .find(|(prefix, _)| zip_code.starts_with(prefix.as_str()))
            .map(|(_, metro)| metro.as_str())
    }

    pub fn fallback(&self) -> Option<&str> {
        self.fallback.as_deref()
    }
}

impl Default for RegionDirectory {
    fn default() -> Self {
        Self::standard()
    }
}
