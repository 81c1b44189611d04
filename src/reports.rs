use crate::aggregate::{percent_within_rows, pivot_counts, pivot_means, summarize_by, Pivot};
use crate::types::{
    ClassifiedFilm, EnrichmentField, EnrichmentRow, FilmPreviewRow, FilmSize, FilmSizeMixRow,
    RoiRow, TrendRow,
};
use crate::util::{format_int, format_number};
use std::collections::BTreeSet;

/// First few classified films, for eyeballing the cleaned data before the
/// aggregates.
pub fn film_preview(films: &[ClassifiedFilm], max_rows: usize) -> Vec<FilmPreviewRow> {
    films
        .iter()
        .take(max_rows)
        .map(|f| FilmPreviewRow {
            id: f.id.clone(),
            title: f.title.clone(),
            year: f.year,
            film_size: f.film_size.to_string(),
            adjusted_budget: format_number(f.adjusted_budget, 0),
            roi: mean_or_na(f.roi, 2),
        })
        .collect()
}

fn size_columns() -> Vec<String> {
    FilmSize::ALL.iter().map(|s| s.label().to_string()).collect()
}

fn mean_or_na(mean: Option<f64>, decimals: usize) -> String {
    mean.map(|m| format_number(m, decimals))
        .unwrap_or_else(|| "n/a".to_string())
}

/// Count and share of films per decade and budget class. Returns the raw
/// count pivot, the percent-of-decade pivot and the combined table rows.
pub fn film_size_mix(films: &[ClassifiedFilm]) -> (Pivot, Pivot, Vec<FilmSizeMixRow>) {
    let columns = size_columns();
    let counts = pivot_counts(
        films,
        |f| Some(f.decade),
        |f| Some(f.film_size.label().to_string()),
        &columns,
    );
    let percent = percent_within_rows(&counts);

    let rows = counts
        .rows
        .iter()
        .enumerate()
        .map(|(ri, decade)| {
            let cell = |ci: usize| {
                let c = counts.cell(ri, ci).unwrap_or(0.0) as i64;
                let p = percent.cell(ri, ci).unwrap_or(0.0);
                format!("{} ({}%)", format_int(c), format_number(p, 2))
            };
            FilmSizeMixRow {
                decade: decade.parse().unwrap_or(0),
                indie: cell(0),
                other: cell(1),
                blockbuster: cell(2),
                total: format_int(counts.row_sum(ri) as i64),
            }
        })
        .collect();

    (counts, percent, rows)
}

/// Mean ROI per decade and budget class. Films without an ROI stay in the
/// film counts but never enter the means.
pub fn roi_by_size(films: &[ClassifiedFilm]) -> (Pivot, Vec<RoiRow>) {
    let columns = size_columns();
    let pivot = pivot_means(
        films,
        |f| Some(f.decade),
        |f| Some(f.film_size.label().to_string()),
        |f| f.roi,
        &columns,
    );

    let groups = summarize_by(films, |f| Some((f.decade, f.film_size)), |f| f.roi);
    let rows = groups
        .iter()
        .map(|((decade, size), g)| RoiRow {
            decade: *decade,
            film_size: size.to_string(),
            films: format_int(g.count as i64),
            with_roi: format_int(g.with_value() as i64),
            mean_roi: mean_or_na(g.mean(), 2),
        })
        .collect();

    (pivot, rows)
}

/// Mean adjusted budget and revenue for one budget class, per decade or,
/// with `by_year`, per individual release year.
pub fn budget_trends(
    films: &[ClassifiedFilm],
    size: FilmSize,
    by_year: bool,
) -> (Pivot, Vec<TrendRow>) {
    let subset: Vec<&ClassifiedFilm> = films.iter().filter(|f| f.film_size == size).collect();
    let period = |f: &&ClassifiedFilm| Some(if by_year { f.year } else { f.decade });
    let budgets = summarize_by(&subset, period, |f| Some(f.adjusted_budget));
    let revenues = summarize_by(&subset, period, |f| f.adjusted_revenue);

    let columns = vec!["Adjusted Budget".to_string(), "Adjusted Revenue".to_string()];
    let rows_keys: Vec<i32> = budgets.keys().copied().collect();
    let values = rows_keys
        .iter()
        .map(|d| {
            vec![
                budgets[d].mean(),
                revenues.get(d).and_then(|g| g.mean()),
            ]
        })
        .collect();
    let pivot = Pivot {
        rows: rows_keys.iter().map(|d| d.to_string()).collect(),
        columns,
        values,
    };

    let rows = rows_keys
        .iter()
        .map(|d| {
            let g = &budgets[d];
            TrendRow {
                period: *d,
                films: format_int(g.count as i64),
                avg_budget: mean_or_na(g.mean(), 0),
                avg_revenue: mean_or_na(revenues.get(d).and_then(|r| r.mean()), 0),
            }
        })
        .collect();

    (pivot, rows)
}

/// Share of films per decade carrying each label of an enrichment column,
/// optionally restricted to one budget class. Films with a blank label are
/// left out of this report entirely.
pub fn enrichment_share(
    films: &[ClassifiedFilm],
    field: EnrichmentField,
    size: Option<FilmSize>,
) -> (Pivot, Vec<EnrichmentRow>) {
    let subset: Vec<&ClassifiedFilm> = films
        .iter()
        .filter(|f| size.map_or(true, |s| f.film_size == s))
        .collect();

    // Labels are free text; distinct trimmed values become the columns,
    // alphabetically.
    let labels: BTreeSet<String> = subset
        .iter()
        .filter_map(|f| field.value(f).map(str::to_string))
        .collect();
    let columns: Vec<String> = labels.into_iter().collect();

    let counts = pivot_counts(
        &subset,
        |f| Some(f.decade),
        |f| field.value(f).map(str::to_string),
        &columns,
    );
    let percent = percent_within_rows(&counts);

    let mut rows = Vec::new();
    for (ri, decade) in counts.rows.iter().enumerate() {
        for (ci, label) in counts.columns.iter().enumerate() {
            let c = counts.cell(ri, ci).unwrap_or(0.0) as i64;
            if c == 0 {
                continue;
            }
            rows.push(EnrichmentRow {
                decade: decade.parse().unwrap_or(0),
                label: label.clone(),
                films: format_int(c),
                pct: format_number(percent.cell(ri, ci).unwrap_or(0.0), 2),
            });
        }
    }

    (percent, rows)
}
