// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Filter, sort and paginate over an in-memory row collection.
//!
//! Every stage is a pure function over borrowed rows. The input collection
//! is never reordered or mutated; each stage returns a new vector of
//! references.

use std::cmp::Ordering;
use std::hash::Hash;

/// A single extracted cell, typed for comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Number(f64),
    Text(&'a str),
}

impl FieldValue<'_> {
    fn sort_text(&self) -> String {
        match self {
            Self::Number(value) => value.to_string().to_lowercase(),
            Self::Text(value) => value.to_lowercase(),
        }
    }
}

pub trait ColumnKey: Copy + Eq + Hash + std::fmt::Debug + 'static {
    fn all() -> &'static [Self];
    /// Wire name, e.g. `currentValue`.
    fn key(self) -> &'static str;
    fn label(self) -> &'static str;
    fn is_numeric(self) -> bool;

    fn from_key(value: &str) -> Option<Self> {
        Self::all().iter().copied().find(|column| column.key() == value)
    }
}

pub trait TableRow {
    type Column: ColumnKey;

    fn value(&self, column: Self::Column) -> FieldValue<'_>;
    fn search_fields(&self) -> Vec<&str>;
    fn cell_text(&self, column: Self::Column) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "asc" | "ascending" => Some(Self::Asc),
            "desc" | "descending" => Some(Self::Desc),
            _ => None,
        }
    }

    pub const fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    pub const fn indicator(self) -> &'static str {
        match self {
            Self::Asc => " ↑",
            Self::Desc => " ↓",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec<C> {
    pub column: C,
    pub direction: SortDirection,
}

impl<C: ColumnKey> SortSpec<C> {
    pub fn new(column: C, direction: SortDirection) -> Self {
        Self { column, direction }
    }

    /// Parses `column` or `column:asc|desc`. A bare column sorts ascending.
    pub fn parse(value: &str) -> Option<Self> {
        let (key, direction) = match value.split_once(':') {
            Some((key, direction)) => (key, SortDirection::parse(direction.trim())?),
            None => (value, SortDirection::Asc),
        };
        let column = C::from_key(key.trim())?;
        Some(Self { column, direction })
    }
}

/// Rows whose search fields contain `search_term`, case-insensitively.
pub fn filter<'a, R: TableRow>(rows: &'a [R], search_term: &str) -> Vec<&'a R> {
    if search_term.is_empty() {
        return rows.iter().collect();
    }
    let needle = search_term.to_lowercase();
    rows.iter()
        .filter(|row| {
            row.search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Pairwise comparison for two cells of the same kind. Mixed pairs compare
/// as lowercased text; `sort` never feeds it a mixed column.
pub fn compare_values(left: FieldValue<'_>, right: FieldValue<'_>) -> Ordering {
    match (left, right) {
        (FieldValue::Number(left), FieldValue::Number(right)) => left.total_cmp(&right),
        (FieldValue::Text(left), FieldValue::Text(right)) => {
            left.to_lowercase().cmp(&right.to_lowercase())
        }
        (left, right) => left.sort_text().cmp(&right.sort_text()),
    }
}

/// Stable sort. Descending reverses the comparator, so tied rows keep their
/// input order in both directions. A column that yields text for any row is
/// compared as lowercased text for every row.
pub fn sort<'a, R: TableRow>(
    rows: &[&'a R],
    column: R::Column,
    direction: SortDirection,
) -> Vec<&'a R> {
    let directed = |ordering: Ordering| match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    };

    let as_text = rows
        .iter()
        .any(|row| matches!(row.value(column), FieldValue::Text(_)));
    if as_text {
        let mut keyed = rows
            .iter()
            .map(|row| (row.value(column).sort_text(), *row))
            .collect::<Vec<_>>();
        keyed.sort_by(|left, right| directed(left.0.cmp(&right.0)));
        return keyed.into_iter().map(|(_, row)| row).collect();
    }

    let mut sorted = rows.to_vec();
    sorted.sort_by(|left, right| {
        directed(compare_values(left.value(column), right.value(column)))
    });
    sorted
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageSlice<T> {
    pub rows: Vec<T>,
    pub page: usize,
    pub page_count: usize,
}

pub fn page_count(total: usize, page_size: usize) -> usize {
    let page_size = page_size.max(1);
    total.div_ceil(page_size).max(1)
}

pub fn clamp_page(page: i64, page_count: usize) -> usize {
    let last = i64::try_from(page_count.max(1)).unwrap_or(i64::MAX);
    // The clamped value lies in 1..=last, which always fits in usize.
    page.clamp(1, last) as usize
}

pub fn paginate<T: Clone>(rows: &[T], page: i64, page_size: usize) -> PageSlice<T> {
    let page_size = page_size.max(1);
    let page_count = page_count(rows.len(), page_size);
    let page = clamp_page(page, page_count);
    let start = (page - 1) * page_size;
    let end = (start + page_size).min(rows.len());
    let rows = if start < rows.len() {
        rows[start..end].to_vec()
    } else {
        Vec::new()
    };
    PageSlice {
        rows,
        page,
        page_count,
    }
}

/// Render-ready result of filter, sort and paginate.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedView<R> {
    pub visible_rows: Vec<R>,
    pub total_match_count: usize,
    pub page_count: usize,
    pub current_page: usize,
    pub items_per_page: usize,
}

impl<R> DerivedView<R> {
    /// 1-based inclusive bounds of the visible rows, or `None` when nothing
    /// matched.
    pub fn showing_range(&self) -> Option<(usize, usize)> {
        if self.visible_rows.is_empty() {
            return None;
        }
        let start = (self.current_page - 1) * self.items_per_page + 1;
        Some((start, start + self.visible_rows.len() - 1))
    }

    pub fn summary(&self) -> String {
        match self.showing_range() {
            Some((start, end)) => format!(
                "Showing {start}–{end} of {} · page {}/{}",
                self.total_match_count, self.current_page, self.page_count
            ),
            None => "No matching rows".to_owned(),
        }
    }
}

pub fn derive_view<R: TableRow + Clone>(
    rows: &[R],
    search_term: &str,
    sort_spec: SortSpec<R::Column>,
    page: i64,
    items_per_page: usize,
) -> DerivedView<R> {
    let matched = filter(rows, search_term);
    let ordered = sort(&matched, sort_spec.column, sort_spec.direction);
    let slice = paginate(&ordered, page, items_per_page);
    DerivedView {
        visible_rows: slice.rows.into_iter().cloned().collect(),
        total_match_count: ordered.len(),
        page_count: slice.page_count,
        current_page: slice.page,
        items_per_page: items_per_page.max(1),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ColumnKey, FieldValue, SortDirection, SortSpec, TableRow, compare_values, derive_view,
        filter, paginate, sort,
    };
    use std::cmp::Ordering;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Col {
        Name,
        Score,
        Mixed,
    }

    impl ColumnKey for Col {
        fn all() -> &'static [Self] {
            &[Self::Name, Self::Score, Self::Mixed]
        }

        fn key(self) -> &'static str {
            match self {
                Self::Name => "name",
                Self::Score => "score",
                Self::Mixed => "mixed",
            }
        }

        fn label(self) -> &'static str {
            self.key()
        }

        fn is_numeric(self) -> bool {
            self == Self::Score
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: usize,
        name: &'static str,
        score: f64,
    }

    impl TableRow for Row {
        type Column = Col;

        fn value(&self, column: Col) -> FieldValue<'_> {
            match column {
                Col::Name => FieldValue::Text(self.name),
                Col::Score => FieldValue::Number(self.score),
                Col::Mixed if self.id % 2 == 0 => FieldValue::Number(self.score),
                Col::Mixed => FieldValue::Text(self.name),
            }
        }

        fn search_fields(&self) -> Vec<&str> {
            vec![self.name]
        }

        fn cell_text(&self, column: Col) -> String {
            match column {
                Col::Score => self.score.to_string(),
                _ => self.name.to_owned(),
            }
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { id: 0, name: "Beta", score: 2.0 },
            Row { id: 1, name: "alpha", score: 5.0 },
            Row { id: 2, name: "Gamma", score: 2.0 },
            Row { id: 3, name: "delta", score: 9.0 },
            Row { id: 4, name: "ALPHABET", score: 2.0 },
        ]
    }

    fn ids(rows: &[&Row]) -> Vec<usize> {
        rows.iter().map(|row| row.id).collect()
    }

    #[test]
    fn empty_search_returns_all_rows_in_order() {
        let data = rows();
        assert_eq!(ids(&filter(&data, "")), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn filter_is_case_insensitive_and_order_preserving() {
        let data = rows();
        assert_eq!(ids(&filter(&data, "ALPHA")), vec![1, 4]);
        assert_eq!(ids(&filter(&data, "ta")), vec![0, 3]);
        assert!(filter(&data, "zzz").is_empty());
    }

    #[test]
    fn sort_ascending_keeps_ties_in_input_order() {
        let data = rows();
        let all = filter(&data, "");
        assert_eq!(ids(&sort(&all, Col::Score, SortDirection::Asc)), vec![0, 2, 4, 1, 3]);
    }

    #[test]
    fn sort_descending_keeps_ties_in_input_order() {
        let data = rows();
        let all = filter(&data, "");
        assert_eq!(ids(&sort(&all, Col::Score, SortDirection::Desc)), vec![3, 1, 0, 2, 4]);
    }

    #[test]
    fn text_sort_ignores_case() {
        let data = rows();
        let all = filter(&data, "");
        assert_eq!(ids(&sort(&all, Col::Name, SortDirection::Asc)), vec![1, 4, 0, 3, 2]);
    }

    #[test]
    fn sort_leaves_input_untouched() {
        let data = rows();
        let all = filter(&data, "");
        let sorted = sort(&all, Col::Score, SortDirection::Desc);
        assert_eq!(sorted.len(), all.len());
        assert_eq!(ids(&all), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn mixed_values_fall_back_to_text_comparison() {
        assert_eq!(
            compare_values(FieldValue::Number(10.0), FieldValue::Text("9")),
            Ordering::Less
        );
        assert_eq!(
            compare_values(FieldValue::Text("abc"), FieldValue::Number(1.0)),
            Ordering::Greater
        );
        let data = rows();
        let all = filter(&data, "");
        assert_eq!(sort(&all, Col::Mixed, SortDirection::Asc).len(), data.len());
    }

    #[test]
    fn mixed_column_sorts_every_row_as_text() {
        const NAMES: [&str; 6] = ["5", "9", "10", "Beta", "alpha", "100"];
        let data = (0..30)
            .map(|id| Row {
                id,
                name: NAMES[id % NAMES.len()],
                score: ((id * 7) % 13) as f64,
            })
            .collect::<Vec<_>>();
        let all = filter(&data, "");

        for direction in [SortDirection::Asc, SortDirection::Desc] {
            let sorted = sort(&all, Col::Mixed, direction);
            assert_eq!(sorted.len(), data.len());
            let keys = sorted
                .iter()
                .map(|row| row.value(Col::Mixed).sort_text())
                .collect::<Vec<_>>();
            for pair in keys.windows(2) {
                match direction {
                    SortDirection::Asc => assert!(pair[0] <= pair[1], "{pair:?}"),
                    SortDirection::Desc => assert!(pair[0] >= pair[1], "{pair:?}"),
                }
            }
        }
    }

    #[test]
    fn mixed_column_ties_keep_input_order() {
        let data = vec![
            Row { id: 0, name: "x", score: 10.0 },
            Row { id: 1, name: "10", score: 0.0 },
            Row { id: 2, name: "y", score: 9.0 },
            Row { id: 3, name: "5", score: 0.0 },
        ];
        let all = filter(&data, "");
        // Keys: "10", "10", "9", "5".
        assert_eq!(ids(&sort(&all, Col::Mixed, SortDirection::Asc)), vec![0, 1, 3, 2]);
        assert_eq!(ids(&sort(&all, Col::Mixed, SortDirection::Desc)), vec![2, 3, 0, 1]);
    }

    #[test]
    fn nan_values_sort_deterministically() {
        let data = vec![
            Row { id: 0, name: "a", score: f64::NAN },
            Row { id: 1, name: "b", score: 1.0 },
            Row { id: 2, name: "c", score: -1.0 },
        ];
        let all = filter(&data, "");
        assert_eq!(ids(&sort(&all, Col::Score, SortDirection::Asc)), vec![2, 1, 0]);
    }

    #[test]
    fn paginate_clamps_out_of_range_pages() {
        let data: Vec<usize> = (0..25).collect();
        for page in [0, -3, i64::MIN] {
            let slice = paginate(&data, page, 10);
            assert_eq!(slice.page, 1);
            assert_eq!(slice.rows, (0..10).collect::<Vec<_>>());
        }
        let last = paginate(&data, 99, 10);
        assert_eq!(last.page, 3);
        assert_eq!(last.page_count, 3);
        assert_eq!(last.rows, (20..25).collect::<Vec<_>>());
    }

    #[test]
    fn paginate_empty_input_has_one_empty_page() {
        let slice = paginate::<usize>(&[], 4, 10);
        assert_eq!(slice.page, 1);
        assert_eq!(slice.page_count, 1);
        assert!(slice.rows.is_empty());
    }

    #[test]
    fn paginate_exact_multiple_has_no_trailing_page() {
        let data: Vec<usize> = (0..20).collect();
        let slice = paginate(&data, 2, 10);
        assert_eq!(slice.page_count, 2);
        assert_eq!(slice.rows.len(), 10);
    }

    #[test]
    fn paginate_treats_zero_page_size_as_one() {
        let data = [1, 2, 3];
        let slice = paginate(&data, 2, 0);
        assert_eq!(slice.page_count, 3);
        assert_eq!(slice.rows, vec![2]);
    }

    #[test]
    fn derive_view_reports_counts_and_range() {
        let data = rows();
        let view = derive_view(
            &data,
            "a",
            SortSpec::new(Col::Score, SortDirection::Desc),
            2,
            2,
        );
        assert_eq!(view.total_match_count, 5);
        assert_eq!(view.page_count, 3);
        assert_eq!(view.current_page, 2);
        assert_eq!(
            view.visible_rows.iter().map(|row| row.id).collect::<Vec<_>>(),
            vec![0, 2]
        );
        assert_eq!(view.showing_range(), Some((3, 4)));
        assert_eq!(view.summary(), "Showing 3–4 of 5 · page 2/3");
    }

    #[test]
    fn derive_view_without_matches_has_no_range() {
        let data = rows();
        let view = derive_view(&data, "zzz", SortSpec::new(Col::Name, SortDirection::Asc), 1, 10);
        assert_eq!(view.total_match_count, 0);
        assert_eq!(view.page_count, 1);
        assert_eq!(view.showing_range(), None);
        assert_eq!(view.summary(), "No matching rows");
    }

    #[test]
    fn sort_spec_parses_direction_suffix() {
        assert_eq!(
            SortSpec::<Col>::parse("score:desc"),
            Some(SortSpec::new(Col::Score, SortDirection::Desc))
        );
        assert_eq!(
            SortSpec::<Col>::parse("name"),
            Some(SortSpec::new(Col::Name, SortDirection::Asc))
        );
        assert_eq!(SortSpec::<Col>::parse("name:sideways"), None);
        assert_eq!(SortSpec::<Col>::parse("height"), None);
    }
}
