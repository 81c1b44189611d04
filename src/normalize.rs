use crate::types::{FilmRecord, RawFilmRow};
use crate::util::{decade_of, parse_date_safe, parse_f64_safe};
use chrono::Datelike;

/// Per-reason drop counts from one normalization pass. Everything here is
/// reported to the console, nothing is fatal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    pub rows_in: usize,
    pub rows_kept: usize,
    pub missing_year: usize,
    pub missing_budget: usize,
    pub past_cutoff: usize,
}

/// Clean raw film rows into typed records.
///
/// - `release_date` is parsed as `YYYY-MM-DD`; an unparseable or absent date
///   means no year, and the row is dropped.
/// - `budget`/`revenue` are coerced with the forgiving numeric parser;
///   a non-numeric budget drops the row, a non-numeric revenue just becomes
///   `None`.
/// - Rows with a year at or past `cutoff_year` are dropped so a partial
///   current year cannot skew the trend tables.
///
/// The input is not mutated, and re-running the pass over rows built from
/// its own output drops nothing further.
pub fn normalize_films(rows: &[RawFilmRow], cutoff_year: i32) -> (Vec<FilmRecord>, NormalizeReport) {
    let mut report = NormalizeReport {
        rows_in: rows.len(),
        ..NormalizeReport::default()
    };
    let mut records: Vec<FilmRecord> = Vec::with_capacity(rows.len());

    for row in rows {
        let year = match parse_date_safe(row.release_date.as_deref()) {
            Some(d) => d.year(),
            None => {
                report.missing_year += 1;
                continue;
            }
        };
        if year >= cutoff_year {
            report.past_cutoff += 1;
            continue;
        }
        let budget = match parse_f64_safe(row.budget.as_deref()) {
            Some(b) => b,
            None => {
                report.missing_budget += 1;
                continue;
            }
        };
        let revenue = parse_f64_safe(row.revenue.as_deref());

        records.push(FilmRecord {
            id: row.id.clone().unwrap_or_default().trim().to_string(),
            title: row.title.clone().unwrap_or_default().trim().to_string(),
            year,
            decade: decade_of(year),
            budget,
            revenue,
            real_true_stories: non_blank(row.real_true_stories.as_deref()),
            adapted_inspired_based: non_blank(row.adapted_inspired_based.as_deref()),
        });
    }

    report.rows_kept = records.len();
    (records, report)
}

fn non_blank(s: Option<&str>) -> Option<String> {
    let s = s?.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: &str, date: &str, budget: &str) -> RawFilmRow {
        RawFilmRow {
            id: Some(id.to_string()),
            title: Some(format!("Film {}", id)),
            release_date: Some(date.to_string()),
            budget: Some(budget.to_string()),
            revenue: None,
            real_true_stories: None,
            adapted_inspired_based: None,
        }
    }

    #[test]
    fn derives_year_and_decade() {
        let rows = vec![raw("1", "1994-06-23", "8000000")];
        let (records, report) = normalize_films(&rows, 2025);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].year, 1994);
        assert_eq!(records[0].decade, 1990);
        assert_eq!(records[0].budget, 8_000_000.0);
        assert_eq!(report.rows_kept, 1);
    }

    #[test]
    fn unparseable_date_drops_the_row() {
        let rows = vec![raw("1", "June 1994", "8000000"), raw("2", "1994-06-23", "1")];
        let (records, report) = normalize_films(&rows, 2025);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "2");
        assert_eq!(report.missing_year, 1);
    }

    #[test]
    fn non_numeric_budget_drops_the_row() {
        let rows = vec![raw("1", "1994-06-23", "unknown")];
        let (records, report) = normalize_films(&rows, 2025);
        assert!(records.is_empty());
        assert_eq!(report.missing_budget, 1);
    }

    #[test]
    fn cutoff_year_excludes_current_partial_year() {
        let rows = vec![raw("1", "2025-01-10", "5"), raw("2", "2024-12-31", "5")];
        let (records, report) = normalize_films(&rows, 2025);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].year, 2024);
        assert_eq!(report.past_cutoff, 1);
    }

    #[test]
    fn zero_budget_is_kept() {
        let rows = vec![raw("1", "1994-06-23", "0")];
        let (records, _) = normalize_films(&rows, 2025);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].budget, 0.0);
    }

    #[test]
    fn normalizing_clean_data_is_idempotent() {
        let rows = vec![
            raw("1", "1984-03-02", "1000000"),
            raw("2", "2001-11-20", "250000000"),
        ];
        let (first, _) = normalize_films(&rows, 2025);

        // Rebuild raw rows from the cleaned output and run the pass again.
        let rebuilt: Vec<RawFilmRow> = first
            .iter()
            .map(|r| RawFilmRow {
                id: Some(r.id.clone()),
                title: Some(r.title.clone()),
                release_date: Some(format!("{:04}-01-01", r.year)),
                budget: Some(format!("{}", r.budget)),
                revenue: r.revenue.map(|v| format!("{}", v)),
                real_true_stories: r.real_true_stories.clone(),
                adapted_inspired_based: r.adapted_inspired_based.clone(),
            })
            .collect();
        let (second, report) = normalize_films(&rebuilt, 2025);

        assert_eq!(first.len(), second.len());
        assert_eq!(report.missing_year, 0);
        assert_eq!(report.missing_budget, 0);
        assert_eq!(report.past_cutoff, 0);
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.year, b.year);
            assert_eq!(a.decade, b.decade);
            assert_eq!(a.budget, b.budget);
        }
    }
}
