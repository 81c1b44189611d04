use chrono::NaiveDate;
use serde::Deserialize;
use std::fmt;
use tabled::Tabled;

#[derive(Debug, Default, Deserialize)]
pub struct RawFilmRow {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub budget: Option<String>,
    #[serde(default)]
    pub revenue: Option<String>,
    #[serde(default)]
    pub real_true_stories: Option<String>,
    #[serde(default)]
    pub adapted_inspired_based: Option<String>,
}

/// A film row that survived cleaning: year and nominal budget are present,
/// decade is derived, revenue stays optional.
#[derive(Debug, Clone, PartialEq)]
pub struct FilmRecord {
    pub id: String,
    pub title: String,
    pub year: i32,
    pub decade: i32,
    pub budget: f64,
    pub revenue: Option<f64>,
    pub real_true_stories: Option<String>,
    pub adapted_inspired_based: Option<String>,
}

/// `FilmRecord` with nominal amounts converted to target-year dollars.
/// Amounts stay unrounded; rounding happens only when formatting.
#[derive(Debug, Clone, PartialEq)]
pub struct AdjustedFilm {
    pub id: String,
    pub title: String,
    pub year: i32,
    pub decade: i32,
    pub adjusted_budget: f64,
    pub adjusted_revenue: Option<f64>,
    pub real_true_stories: Option<String>,
    pub adapted_inspired_based: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedFilm {
    pub id: String,
    pub title: String,
    pub year: i32,
    pub decade: i32,
    pub adjusted_budget: f64,
    pub adjusted_revenue: Option<f64>,
    pub film_size: FilmSize,
    pub roi: Option<f64>,
    pub real_true_stories: Option<String>,
    pub adapted_inspired_based: Option<String>,
}

// Variant order doubles as the natural stacking/sort order, smallest
// budget class first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, clap::ValueEnum)]
pub enum FilmSize {
    Indie,
    Other,
    Blockbuster,
}

impl FilmSize {
    pub const ALL: [FilmSize; 3] = [FilmSize::Indie, FilmSize::Other, FilmSize::Blockbuster];

    pub fn label(&self) -> &'static str {
        match self {
            FilmSize::Indie => "Indie",
            FilmSize::Other => "Other",
            FilmSize::Blockbuster => "Blockbuster",
        }
    }
}

impl fmt::Display for FilmSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which free-text enrichment column to group by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum EnrichmentField {
    RealTrueStories,
    AdaptedInspiredBased,
}

impl EnrichmentField {
    pub fn column(&self) -> &'static str {
        match self {
            EnrichmentField::RealTrueStories => "real_true_stories",
            EnrichmentField::AdaptedInspiredBased => "adapted_inspired_based",
        }
    }

    /// Trimmed label for a film, `None` when the column is blank or absent.
    pub fn value<'a>(&self, film: &'a ClassifiedFilm) -> Option<&'a str> {
        let v = match self {
            EnrichmentField::RealTrueStories => film.real_true_stories.as_deref(),
            EnrichmentField::AdaptedInspiredBased => film.adapted_inspired_based.as_deref(),
        }?;
        let v = v.trim();
        if v.is_empty() {
            None
        } else {
            Some(v)
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RawBusinessRow {
    #[serde(default)]
    pub business_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub categories: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub is_open: Option<String>,
    #[serde(default)]
    pub last_review_date: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BusinessCategory {
    ArtGallery,
    Restaurant,
}

impl BusinessCategory {
    pub fn label(&self) -> &'static str {
        match self {
            BusinessCategory::ArtGallery => "Art Gallery",
            BusinessCategory::Restaurant => "Restaurant",
        }
    }
}

impl fmt::Display for BusinessCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BusinessRecord {
    pub id: String,
    pub category: BusinessCategory,
    pub city: String,
    pub open: bool,
    pub last_review: Option<NaiveDate>,
}

#[derive(Debug, Clone, Tabled)]
pub struct FilmSizeMixRow {
    #[tabled(rename = "Decade")]
    pub decade: i32,
    #[tabled(rename = "Indie")]
    pub indie: String,
    #[tabled(rename = "Other")]
    pub other: String,
    #[tabled(rename = "Blockbuster")]
    pub blockbuster: String,
    #[tabled(rename = "Films")]
    pub total: String,
}

#[derive(Debug, Clone, Tabled)]
pub struct RoiRow {
    #[tabled(rename = "Decade")]
    pub decade: i32,
    #[tabled(rename = "FilmSize")]
    pub film_size: String,
    #[tabled(rename = "Films")]
    pub films: String,
    #[tabled(rename = "WithRoi")]
    pub with_roi: String,
    #[tabled(rename = "MeanRoiPct")]
    pub mean_roi: String,
}

#[derive(Debug, Clone, Tabled)]
pub struct TrendRow {
    #[tabled(rename = "Period")]
    pub period: i32,
    #[tabled(rename = "Films")]
    pub films: String,
    #[tabled(rename = "AvgAdjBudget")]
    pub avg_budget: String,
    #[tabled(rename = "AvgAdjRevenue")]
    pub avg_revenue: String,
}

#[derive(Debug, Clone, Tabled)]
pub struct EnrichmentRow {
    #[tabled(rename = "Decade")]
    pub decade: i32,
    #[tabled(rename = "Label")]
    pub label: String,
    #[tabled(rename = "Films")]
    pub films: String,
    #[tabled(rename = "PctOfDecade")]
    pub pct: String,
}

#[derive(Debug, Clone, Tabled)]
pub struct FilmPreviewRow {
    #[tabled(rename = "Id")]
    pub id: String,
    #[tabled(rename = "Title")]
    pub title: String,
    #[tabled(rename = "Year")]
    pub year: i32,
    #[tabled(rename = "FilmSize")]
    pub film_size: String,
    #[tabled(rename = "AdjBudget")]
    pub adjusted_budget: String,
    #[tabled(rename = "RoiPct")]
    pub roi: String,
}

#[derive(Debug, Clone, Tabled)]
pub struct ClosureRow {
    #[tabled(rename = "Category")]
    pub category: String,
    #[tabled(rename = "City")]
    pub city: String,
    #[tabled(rename = "Businesses")]
    pub businesses: String,
    #[tabled(rename = "Closed")]
    pub closed: String,
    #[tabled(rename = "ClosedPct")]
    pub closed_pct: String,
}
