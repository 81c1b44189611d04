use crate::types::{AdjustedFilm, ClassifiedFilm, FilmSize};

/// Budget cutoffs, in target-year dollars. Different analyses use
/// different pairs, so these are run configuration rather than constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub indie_max: f64,
    pub blockbuster_min: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Thresholds {
            indie_max: 15_000_000.0,
            blockbuster_min: 100_000_000.0,
        }
    }
}

/// Total three-way partition on the adjusted budget: at or below the low
/// cutoff is Indie, strictly above the high cutoff is Blockbuster,
/// everything between is Other.
pub fn classify(adjusted_budget: f64, thresholds: &Thresholds) -> FilmSize {
    if adjusted_budget <= thresholds.indie_max {
        FilmSize::Indie
    } else if adjusted_budget > thresholds.blockbuster_min {
        FilmSize::Blockbuster
    } else {
        FilmSize::Other
    }
}

/// Percent return on investment from unrounded adjusted amounts.
/// `None` when revenue is missing or the adjusted budget is zero.
pub fn roi(adjusted_budget: f64, adjusted_revenue: Option<f64>) -> Option<f64> {
    let revenue = adjusted_revenue?;
    if adjusted_budget == 0.0 {
        return None;
    }
    Some((revenue - adjusted_budget) / adjusted_budget * 100.0)
}

pub fn classify_films(films: &[AdjustedFilm], thresholds: &Thresholds) -> Vec<ClassifiedFilm> {
    films
        .iter()
        .map(|f| ClassifiedFilm {
            id: f.id.clone(),
            title: f.title.clone(),
            year: f.year,
            decade: f.decade,
            adjusted_budget: f.adjusted_budget,
            adjusted_revenue: f.adjusted_revenue,
            film_size: classify(f.adjusted_budget, thresholds),
            roi: roi(f.adjusted_budget, f.adjusted_revenue),
            real_true_stories: f.real_true_stories.clone(),
            adapted_inspired_based: f.adapted_inspired_based.clone(),
        })
        .collect()
}
