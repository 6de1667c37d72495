//! Sector universe: an ordered table of named ticker groups.
//!
//! Stored as TOML (`[[sectors]]` with `name` and `tickers`). Sector order is
//! significant: it is the column order of the combined dataset.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// A sector (e.g. Technology, Healthcare) and its member tickers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sector {
    pub name: String,
    pub tickers: Vec<String>,
}

impl Sector {
    pub fn new(name: impl Into<String>, tickers: &[&str]) -> Self {
        Self {
            name: name.into(),
            tickers: tickers.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// The complete sector table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Universe {
    pub sectors: Vec<Sector>,
}

impl Universe {
    pub fn new(sectors: Vec<Sector>) -> Result<Self, String> {
        let universe = Self { sectors };
        universe.validate()?;
        Ok(universe)
    }

    /// Load a universe from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let content =
            std::fs::read_to_string(path).map_err(|e| format!("read universe file: {e}"))?;
        Self::from_toml(&content)
    }

    /// Parse a universe from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, String> {
        let universe: Self =
            toml::from_str(content).map_err(|e| format!("parse universe TOML: {e}"))?;
        universe.validate()?;
        Ok(universe)
    }

    /// Serialize the universe to TOML.
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("serialize universe: {e}"))
    }

    fn validate(&self) -> Result<(), String> {
        for (i, sector) in self.sectors.iter().enumerate() {
            if sector.name.trim().is_empty() {
                return Err(format!("sector #{} has an empty name", i + 1));
            }
            if self.sectors[..i].iter().any(|s| s.name == sector.name) {
                return Err(format!("duplicate sector '{}'", sector.name));
            }
        }
        Ok(())
    }

    /// Sector names in definition order.
    pub fn sector_names(&self) -> Vec<&str> {
        self.sectors.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn sector_tickers(&self, name: &str) -> Option<&[String]> {
        self.sectors
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.tickers.as_slice())
    }

    /// All tickers across all sectors, in definition order.
    pub fn all_tickers(&self) -> Vec<&str> {
        self.sectors
            .iter()
            .flat_map(|s| s.tickers.iter().map(|t| t.as_str()))
            .collect()
    }

    pub fn ticker_count(&self) -> usize {
        self.sectors.iter().map(|s| s.tickers.len()).sum()
    }

    /// The default eleven-sector US equity table.
    pub fn default_sectors() -> Self {
        let sectors = vec![
            Sector::new(
                "Technology",
                &[
                    "MSFT", "AAPL", "NVDA", "TSM", "AVGO", "ADI", "AMAT", "AMD", "CSCO", "CRM",
                    "GFS", "INTC", "LRCX", "MCHP", "MRVL", "MU", "NXPI", "ORCL", "QCOM", "SNPS",
                    "TER", "TXN", "WDC", "ZBRA", "KLAC", "CDNS", "ANSS", "AKAM", "FTNT",
                ],
            ),
            Sector::new(
                "Financial Services",
                &[
                    "BRK-A", "JPM", "MA", "BAC", "WFC", "C", "GS", "MS", "SCHW", "AXP", "BK",
                    "BLK", "TROW", "STT", "PNC", "USB", "CME", "ICE", "MMC", "AON", "MET", "PRU",
                    "AFL", "LNC", "CINF", "ALL", "PGR", "TRV", "CB", "HIG",
                ],
            ),
            Sector::new(
                "Communication Services",
                &[
                    "GOOGL", "GOOG", "NFLX", "TMUS", "DIS", "CMCSA", "CHTR", "T", "VZ", "FOXA",
                    "FOX", "IRDM", "SIRI", "AMX", "TKC", "TU", "BCE", "TEF", "ORAN", "DTEGY",
                    "CHT", "SKM", "KT", "LUMN", "LILA", "LILAK", "CCOI", "WBD",
                ],
            ),
            Sector::new(
                "Healthcare",
                &[
                    "LLY", "NVO", "UNH", "JNJ", "MRK", "PFE", "ABBV", "ABT", "TMO", "MDT", "BMY",
                    "AMGN", "GILD", "DHR", "ISRG", "REGN", "BIIB", "MRNA", "DXCM", "IDXX", "SYK",
                    "EW", "BSX", "ZBH", "CNC", "RMD", "STE", "MASI", "ALGN", "HOLX",
                ],
            ),
            Sector::new(
                "Consumer Cyclical",
                &[
                    "AMZN", "TSLA", "HD", "TM", "MCD", "NKE", "SBUX", "LOW", "TGT", "TJX",
                    "EBAY", "ROST", "MAR", "YUM", "DG", "CMG", "ULTA", "AZO", "BBY", "DHI", "LEN",
                    "PZZA", "W", "RH", "TPX", "DKNG", "LVS", "WYNN", "BKNG", "ORLY",
                ],
            ),
            Sector::new(
                "Industrials",
                &[
                    "CAT", "GE", "UNP", "RTX", "ETN", "HON", "UPS", "BA", "MMM", "DE", "LMT",
                    "NSC", "CSX", "DAL", "AAL", "UAL", "LUV", "EXPD", "CHRW", "R", "JBHT", "KNX",
                    "WERN", "ODFL", "HUBG", "SNDR", "MRTN", "HTLD", "ITW", "GD",
                ],
            ),
            Sector::new(
                "Consumer Defensive",
                &[
                    "WMT", "PG", "COST", "KO", "PEP", "PM", "MO", "KHC", "MDLZ", "STZ", "KDP",
                    "GIS", "CL", "CPB", "HSY", "K", "TSN", "SJM", "MKC", "CHD", "LW", "HRL",
                    "CAG", "FDP", "HAIN", "THS", "SPTN", "BGS", "FARM", "FLO",
                ],
            ),
            Sector::new(
                "Energy",
                &[
                    "XOM", "CVX", "TTE", "COP", "SLB", "OXY", "PSX", "EOG", "MPC", "HAL", "MRO",
                    "DVN", "EPD", "WMB", "KMI", "TRGP", "OKE", "ET", "LNG", "ENLC", "HESM", "BSM",
                    "AM",
                ],
            ),
            Sector::new(
                "Basic Materials",
                &[
                    "LIN", "BHP", "RIO", "SCCO", "SHW", "APD", "NEM", "DD", "DOW", "PPG", "ECL",
                    "FMC", "ALB", "CE", "EMN", "AVNT", "AXTA", "ASH", "NEU", "IOSP", "OLN", "WLK",
                    "HUN", "CC", "CBT", "TROX",
                ],
            ),
            Sector::new(
                "Real Estate",
                &[
                    "PLD", "AMT", "EQIX", "WELL", "SPG", "PSA", "DLR", "VTR", "AVB", "ESS", "EQR",
                    "UDR", "MAA", "SUI", "CPT", "HST", "AIRC", "ARE", "BXP", "SLG", "FRT", "REG",
                    "KIM", "BRX", "ROIC", "MAC", "AKR",
                ],
            ),
            Sector::new(
                "Utilities",
                &[
                    "NEE", "DUK", "SO", "EXC", "AEP", "XEL", "ES", "PEG", "EIX", "D", "WEC",
                    "PCG", "SRE", "ED", "FE", "PPL", "AEE", "CMS", "DTE", "LNT", "NI", "AWK",
                    "CNP", "NRG", "ETR", "PNW", "VST", "OGE", "IDA",
                ],
            ),
        ];

        Self { sectors }
    }
}
