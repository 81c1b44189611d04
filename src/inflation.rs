use once_cell::sync::Lazy;
use std::collections::{BTreeMap, HashMap};
use std::error::Error;
use std::path::Path;

use crate::types::{AdjustedFilm, FilmRecord};

// CPI-U annual averages (1982-84 = 100), bundled so runs work without a
// separately downloaded index file. A user-supplied snapshot via --cpi
// takes precedence.
static BUNDLED_CPI: Lazy<PriceIndex> = Lazy::new(|| {
    PriceIndex::from_json_str(include_str!("cpi_u_annual.json"))
        .expect("bundled CPI snapshot is valid JSON")
});

/// Immutable year -> index-value snapshot. Built once before the run and
/// passed by reference into the adjustment step.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceIndex {
    series: BTreeMap<i32, f64>,
}

impl PriceIndex {
    pub fn from_series(series: BTreeMap<i32, f64>) -> Self {
        PriceIndex { series }
    }

    fn from_json_str(s: &str) -> Result<Self, Box<dyn Error>> {
        let raw: BTreeMap<String, f64> = serde_json::from_str(s)?;
        let mut series = BTreeMap::new();
        for (year, value) in raw {
            let year: i32 = year
                .parse()
                .map_err(|_| format!("invalid year key '{}' in price index", year))?;
            if value <= 0.0 {
                return Err(format!("non-positive index value for year {}", year).into());
            }
            series.insert(year, value);
        }
        if series.is_empty() {
            return Err("price index snapshot contains no years".into());
        }
        Ok(PriceIndex { series })
    }

    /// Load a snapshot from a JSON object of `"year": index` pairs.
    pub fn from_json_file(path: &Path) -> Result<Self, Box<dyn Error>> {
        let s = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read price index '{}': {}", path.display(), e))?;
        Self::from_json_str(&s)
    }

    /// The snapshot shipped with the binary.
    pub fn bundled() -> &'static PriceIndex {
        &BUNDLED_CPI
    }

    pub fn value(&self, year: i32) -> Option<f64> {
        self.series.get(&year).copied()
    }

    /// Factor converting a nominal amount in `from` to `to` dollars.
    /// `None` when either year is absent from the snapshot.
    pub fn multiplier(&self, from: i32, to: i32) -> Option<f64> {
        Some(self.value(to)? / self.value(from)?)
    }
}

/// Year -> multiplier lookup for one run, every multiplier targeting the
/// same year. Years missing from the snapshot are simply absent here.
#[derive(Debug, Clone, PartialEq)]
pub struct InflationTable {
    target_year: i32,
    factors: HashMap<i32, f64>,
}

impl InflationTable {
    /// Compute the multiplier once per distinct year in the data.
    pub fn build(
        years: impl IntoIterator<Item = i32>,
        index: &PriceIndex,
        target_year: i32,
    ) -> Self {
        let mut factors = HashMap::new();
        for year in years {
            if factors.contains_key(&year) {
                continue;
            }
            if let Some(m) = index.multiplier(year, target_year) {
                factors.insert(year, m);
            }
        }
        InflationTable {
            target_year,
            factors,
        }
    }

    pub fn target_year(&self) -> i32 {
        self.target_year
    }

    pub fn factor(&self, year: i32) -> Option<f64> {
        self.factors.get(&year).copied()
    }
}

/// Convert each record's nominal amounts using the multiplier for the
/// record's own year. A record whose year has no multiplier is excluded
/// and counted; amounts are not rounded here.
pub fn adjust_films(films: &[FilmRecord], table: &InflationTable) -> (Vec<AdjustedFilm>, usize) {
    let mut adjusted = Vec::with_capacity(films.len());
    let mut no_factor = 0usize;

    for film in films {
        let factor = match table.factor(film.year) {
            Some(f) => f,
            None => {
                no_factor += 1;
                continue;
            }
        };
        adjusted.push(AdjustedFilm {
            id: film.id.clone(),
            title: film.title.clone(),
            year: film.year,
            decade: film.decade,
            adjusted_budget: film.budget * factor,
            adjusted_revenue: film.revenue.map(|r| r * factor),
            real_true_stories: film.real_true_stories.clone(),
            adapted_inspired_based: film.adapted_inspired_based.clone(),
        });
    }
    (adjusted, no_factor)
}
