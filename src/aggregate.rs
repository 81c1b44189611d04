use std::collections::BTreeMap;

/// Count plus running mean input for one group. `count` includes every
/// record in the group; the mean only covers records that had a value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupSummary {
    pub count: usize,
    sum: f64,
    with_value: usize,
}

impl GroupSummary {
    pub fn push(&mut self, value: Option<f64>) {
        self.count += 1;
        if let Some(v) = value {
            self.sum += v;
            self.with_value += 1;
        }
    }

    pub fn with_value(&self) -> usize {
        self.with_value
    }

    pub fn mean(&self) -> Option<f64> {
        if self.with_value == 0 {
            None
        } else {
            Some(self.sum / self.with_value as f64)
        }
    }
}

/// Group records by a key and fold counts/means. A `BTreeMap` keeps the
/// output in natural key order, which downstream tables and charts rely on
/// for reproducible output.
pub fn summarize_by<R, K, KF, VF>(records: &[R], key: KF, value: VF) -> BTreeMap<K, GroupSummary>
where
    K: Ord,
    KF: Fn(&R) -> Option<K>,
    VF: Fn(&R) -> Option<f64>,
{
    let mut out: BTreeMap<K, GroupSummary> = BTreeMap::new();
    for r in records {
        if let Some(k) = key(r) {
            out.entry(k).or_default().push(value(r));
        }
    }
    out
}

/// Rows-by-columns view of a summary, ready for tables and charts.
/// Column order is supplied by the caller and is also the stacking order
/// when the pivot is drawn; it is never re-sorted here or in the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct Pivot {
    pub rows: Vec<String>,
    pub columns: Vec<String>,
    /// `values[row][column]`; `None` means no observation for that cell.
    pub values: Vec<Vec<Option<f64>>>,
}

impl Pivot {
    pub fn cell(&self, row: usize, col: usize) -> Option<f64> {
        self.values.get(row)?.get(col).copied()?
    }

    pub fn row_sum(&self, row: usize) -> f64 {
        self.values[row].iter().flatten().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Count records per (outer, inner) pair and lay the result out with one
/// row per distinct outer key (in ascending order) and the given columns.
/// Inner labels that are not in `columns` are ignored; pairs that never
/// occur get an explicit zero.
pub fn pivot_counts<R, OF, IF>(records: &[R], outer: OF, inner: IF, columns: &[String]) -> Pivot
where
    OF: Fn(&R) -> Option<i32>,
    IF: Fn(&R) -> Option<String>,
{
    let mut counts: BTreeMap<i32, Vec<f64>> = BTreeMap::new();
    for r in records {
        let (Some(o), Some(label)) = (outer(r), inner(r)) else {
            continue;
        };
        let Some(ci) = columns.iter().position(|c| *c == label) else {
            continue;
        };
        counts.entry(o).or_insert_with(|| vec![0.0; columns.len()])[ci] += 1.0;
    }

    let rows: Vec<String> = counts.keys().map(|k| k.to_string()).collect();
    let values: Vec<Vec<Option<f64>>> = counts
        .into_values()
        .map(|row| row.into_iter().map(Some).collect())
        .collect();
    Pivot {
        rows,
        columns: columns.to_vec(),
        values,
    }
}

/// Mean of a numeric field per (outer, inner) pair, same layout as
/// [`pivot_counts`]. Cells with no observed value stay `None`.
pub fn pivot_means<R, OF, IF, VF>(
    records: &[R],
    outer: OF,
    inner: IF,
    value: VF,
    columns: &[String],
) -> Pivot
where
    OF: Fn(&R) -> Option<i32>,
    IF: Fn(&R) -> Option<String>,
    VF: Fn(&R) -> Option<f64>,
{
    let mut groups: BTreeMap<i32, Vec<GroupSummary>> = BTreeMap::new();
    for r in records {
        let (Some(o), Some(label)) = (outer(r), inner(r)) else {
            continue;
        };
        let Some(ci) = columns.iter().position(|c| *c == label) else {
            continue;
        };
        groups
            .entry(o)
            .or_insert_with(|| vec![GroupSummary::default(); columns.len()])[ci]
            .push(value(r));
    }

    let rows: Vec<String> = groups.keys().map(|k| k.to_string()).collect();
    let values: Vec<Vec<Option<f64>>> = groups
        .into_values()
        .map(|row| row.iter().map(|g| g.mean()).collect())
        .collect();
    Pivot {
        rows,
        columns: columns.to_vec(),
        values,
    }
}

/// Scale every row so its cells sum to 100. Rows that sum to zero are left
/// as zeros rather than dividing by zero.
pub fn percent_within_rows(pivot: &Pivot) -> Pivot {
    let values = pivot
        .values
        .iter()
        .map(|row| {
            let total: f64 = row.iter().flatten().sum();
            row.iter()
                .map(|cell| {
                    cell.map(|v| if total > 0.0 { v / total * 100.0 } else { 0.0 })
                })
                .collect()
        })
        .collect();
    Pivot {
        rows: pivot.rows.clone(),
        columns: pivot.columns.clone(),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Rec {
        decade: i32,
        size: &'static str,
        roi: Option<f64>,
    }

    fn data() -> Vec<Rec> {
        vec![
            Rec { decade: 1990, size: "Indie", roi: Some(10.0) },
            Rec { decade: 1990, size: "Indie", roi: None },
            Rec { decade: 1990, size: "Blockbuster", roi: Some(30.0) },
            Rec { decade: 1980, size: "Other", roi: Some(-20.0) },
            Rec { decade: 2000, size: "Indie", roi: Some(50.0) },
        ]
    }

    fn size_columns() -> Vec<String> {
        vec!["Indie".into(), "Other".into(), "Blockbuster".into()]
    }

    #[test]
    fn summarize_counts_all_but_means_only_values() {
        let recs = data();
        let by_decade = summarize_by(&recs, |r| Some(r.decade), |r| r.roi);
        let g = &by_decade[&1990];
        assert_eq!(g.count, 3);
        assert_eq!(g.with_value(), 2);
        assert_eq!(g.mean(), Some(20.0));
    }

    #[test]
    fn summarize_skips_records_without_a_key() {
        let recs = data();
        let only_nineties = summarize_by(
            &recs,
            |r| if r.decade == 1990 { Some(r.decade) } else { None },
            |_| None,
        );
        assert_eq!(only_nineties.len(), 1);
        assert_eq!(only_nineties[&1990].count, 3);
        assert_eq!(only_nineties[&1990].mean(), None);
    }

    #[test]
    fn pivot_rows_are_chronological_and_zero_filled() {
        let recs = data();
        let p = pivot_counts(&recs, |r| Some(r.decade), |r| Some(r.size.to_string()), &size_columns());
        assert_eq!(p.rows, vec!["1980", "1990", "2000"]);
        assert_eq!(p.columns, size_columns());
        // 1980 has a single Other film and explicit zeros elsewhere.
        assert_eq!(p.values[0], vec![Some(0.0), Some(1.0), Some(0.0)]);
        assert_eq!(p.values[1], vec![Some(2.0), Some(0.0), Some(1.0)]);
    }

    #[test]
    fn percent_rows_sum_to_one_hundred() {
        let recs = data();
        let counts = pivot_counts(&recs, |r| Some(r.decade), |r| Some(r.size.to_string()), &size_columns());
        let pct = percent_within_rows(&counts);
        for row in 0..pct.rows.len() {
            let sum = pct.row_sum(row);
            assert!((sum - 100.0).abs() < 0.1, "row {} sums to {}", row, sum);
        }
        // 1990: two Indie of three films.
        assert!((pct.cell(1, 0).unwrap() - 66.666).abs() < 0.01);
    }

    #[test]
    fn mean_pivot_leaves_unobserved_cells_empty() {
        let recs = data();
        let p = pivot_means(
            &recs,
            |r| Some(r.decade),
            |r| Some(r.size.to_string()),
            |r| r.roi,
            &size_columns(),
        );
        // 1990 Indie has one ROI value of 10 (the None record is excluded
        // from the mean), 1990 Other never occurs.
        assert_eq!(p.cell(1, 0), Some(10.0));
        assert_eq!(p.cell(1, 1), None);
    }

    #[test]
    fn zero_sum_rows_do_not_divide_by_zero() {
        let p = Pivot {
            rows: vec!["1970".into()],
            columns: vec!["A".into()],
            values: vec![vec![Some(0.0)]],
        };
        let pct = percent_within_rows(&p);
        assert_eq!(pct.cell(0, 0), Some(0.0));
    }
}
