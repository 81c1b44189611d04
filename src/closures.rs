use crate::aggregate::Pivot;
use crate::types::{BusinessCategory, BusinessRecord, ClosureRow, RawBusinessRow};
use crate::util::{format_int, format_number, parse_date_safe, parse_i32_safe};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Run-level filters for the closure comparison: which cities count, and
/// how recent the latest review must be for a business to count as part of
/// the current population.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosureFilters {
    pub cities: Vec<String>,
    pub since: NaiveDate,
}

impl Default for ClosureFilters {
    fn default() -> Self {
        ClosureFilters {
            cities: vec!["New York City".to_string(), "Los Angeles".to_string()],
            since: NaiveDate::from_ymd_opt(2018, 1, 1).expect("valid date"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BusinessReport {
    pub rows_in: usize,
    pub rows_kept: usize,
    pub no_category: usize,
    pub other_city: usize,
    pub stale_review: usize,
    pub bad_is_open: usize,
}

// The categories column is comma-separated free text; a business counts as
// a gallery if any fragment mentions one, with gallery taking precedence
// over restaurant when both appear.
fn bucket_category(categories: Option<&str>) -> Option<BusinessCategory> {
    let c = categories?.to_lowercase();
    if c.contains("art galler") {
        Some(BusinessCategory::ArtGallery)
    } else if c.contains("restaurant") {
        Some(BusinessCategory::Restaurant)
    } else {
        None
    }
}

/// Clean raw business rows into typed records, applying the category,
/// city and review-recency filters. Per-row failures are counted and the
/// row dropped; nothing here is fatal.
pub fn normalize_businesses(
    rows: &[RawBusinessRow],
    filters: &ClosureFilters,
) -> (Vec<BusinessRecord>, BusinessReport) {
    let mut report = BusinessReport {
        rows_in: rows.len(),
        ..BusinessReport::default()
    };
    let mut records = Vec::new();

    for row in rows {
        let Some(category) = bucket_category(row.categories.as_deref()) else {
            report.no_category += 1;
            continue;
        };
        let city = row.city.as_deref().unwrap_or("").trim().to_string();
        if !filters
            .cities
            .iter()
            .any(|c| c.eq_ignore_ascii_case(&city))
        {
            report.other_city += 1;
            continue;
        }
        let open = match parse_i32_safe(row.is_open.as_deref()) {
            Some(0) => false,
            Some(1) => true,
            _ => {
                report.bad_is_open += 1;
                continue;
            }
        };
        let last_review = parse_date_safe(row.last_review_date.as_deref());
        match last_review {
            Some(d) if d >= filters.since => {}
            _ => {
                report.stale_review += 1;
                continue;
            }
        }

        records.push(BusinessRecord {
            id: row.business_id.clone().unwrap_or_default().trim().to_string(),
            category,
            city,
            open,
            last_review,
        });
    }

    report.rows_kept = records.len();
    (records, report)
}

/// Share of closed businesses per category, with a per-city breakdown in
/// the table. The pivot carries the overall per-category percentages for
/// the chart.
pub fn closure_summary(records: &[BusinessRecord]) -> (Pivot, Vec<ClosureRow>) {
    // (total, closed) per category and per category-city pair.
    let mut by_cat: BTreeMap<BusinessCategory, (usize, usize)> = BTreeMap::new();
    let mut by_cat_city: BTreeMap<(BusinessCategory, String), (usize, usize)> = BTreeMap::new();
    for r in records {
        let e = by_cat.entry(r.category).or_default();
        e.0 += 1;
        if !r.open {
            e.1 += 1;
        }
        let e = by_cat_city
            .entry((r.category, r.city.clone()))
            .or_default();
        e.0 += 1;
        if !r.open {
            e.1 += 1;
        }
    }

    let closed_pct = |total: usize, closed: usize| {
        if total == 0 {
            0.0
        } else {
            closed as f64 / total as f64 * 100.0
        }
    };

    let mut rows = Vec::new();
    for (cat, (total, closed)) in &by_cat {
        rows.push(ClosureRow {
            category: cat.to_string(),
            city: "All".to_string(),
            businesses: format_int(*total as i64),
            closed: format_int(*closed as i64),
            closed_pct: format_number(closed_pct(*total, *closed), 2),
        });
    }
    for ((cat, city), (total, closed)) in &by_cat_city {
        rows.push(ClosureRow {
            category: cat.to_string(),
            city: city.clone(),
            businesses: format_int(*total as i64),
            closed: format_int(*closed as i64),
            closed_pct: format_number(closed_pct(*total, *closed), 2),
        });
    }

    let pivot = Pivot {
        rows: by_cat.keys().map(|c| c.to_string()).collect(),
        columns: vec!["Closed %".to_string()],
        values: by_cat
            .values()
            .map(|(total, closed)| vec![Some(closed_pct(*total, *closed))])
            .collect(),
    };

    (pivot, rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: &str, categories: &str, city: &str, is_open: &str, review: &str) -> RawBusinessRow {
        RawBusinessRow {
            business_id: Some(id.to_string()),
            name: None,
            categories: Some(categories.to_string()),
            city: Some(city.to_string()),
            is_open: Some(is_open.to_string()),
            last_review_date: Some(review.to_string()),
        }
    }

    #[test]
    fn buckets_categories_with_gallery_precedence() {
        assert_eq!(
            bucket_category(Some("Art Galleries, Arts & Entertainment")),
            Some(BusinessCategory::ArtGallery)
        );
        assert_eq!(
            bucket_category(Some("Restaurants, Italian")),
            Some(BusinessCategory::Restaurant)
        );
        assert_eq!(
            bucket_category(Some("Art Gallery, Restaurant")),
            Some(BusinessCategory::ArtGallery)
        );
        assert_eq!(bucket_category(Some("Plumbing")), None);
        assert_eq!(bucket_category(None), None);
    }

    #[test]
    fn filters_city_and_review_recency() {
        let rows = vec![
            raw("1", "Art Galleries", "New York City", "1", "2020-05-01"),
            raw("2", "Art Galleries", "Chicago", "1", "2020-05-01"),
            raw("3", "Restaurants", "Los Angeles", "0", "2017-12-31"),
            raw("4", "Restaurants", "Los Angeles", "maybe", "2020-05-01"),
        ];
        let (records, report) = normalize_businesses(&rows, &ClosureFilters::default());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "1");
        assert_eq!(report.other_city, 1);
        assert_eq!(report.stale_review, 1);
        assert_eq!(report.bad_is_open, 1);
    }

    #[test]
    fn closure_percentages_split_by_category() {
        let rows = vec![
            raw("1", "Art Galleries", "New York City", "0", "2020-01-01"),
            raw("2", "Art Galleries", "New York City", "0", "2020-01-01"),
            raw("3", "Art Galleries", "Los Angeles", "1", "2020-01-01"),
            raw("4", "Restaurants", "New York City", "0", "2020-01-01"),
            raw("5", "Restaurants", "Los Angeles", "1", "2020-01-01"),
            raw("6", "Restaurants", "Los Angeles", "1", "2020-01-01"),
            raw("7", "Restaurants", "New York City", "1", "2020-01-01"),
        ];
        let (records, _) = normalize_businesses(&rows, &ClosureFilters::default());
        let (pivot, table) = closure_summary(&records);

        assert_eq!(pivot.rows, vec!["Art Gallery", "Restaurant"]);
        assert!((pivot.cell(0, 0).unwrap() - 66.6667).abs() < 0.01);
        assert!((pivot.cell(1, 0).unwrap() - 25.0).abs() < 0.01);

        let gallery_all = table
            .iter()
            .find(|r| r.category == "Art Gallery" && r.city == "All")
            .unwrap();
        assert_eq!(gallery_all.businesses, "3");
        assert_eq!(gallery_all.closed, "2");
        // Per-city rows exist alongside the totals.
        assert!(table
            .iter()
            .any(|r| r.category == "Restaurant" && r.city == "Los Angeles"));
    }
}
