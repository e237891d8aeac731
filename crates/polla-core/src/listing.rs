// List-view pipeline: substring filter, stable sort, page slicing.
//
// The free functions are pure; `ListView` bundles them with the per-screen
// transient state (filter text, sort descriptor, current page).

use std::cmp::Ordering;
use std::fmt::Debug;

use chrono::NaiveDate;

use crate::models::{Team, Tournament};

// ---------------------------------------------------------------------------
// Sorting primitives
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortDescriptor<C> {
    pub column: C,
    pub direction: SortDirection,
}

impl<C> SortDescriptor<C> {
    pub fn ascending(column: C) -> Self {
        Self {
            column,
            direction: SortDirection::Ascending,
        }
    }
}

/// A cell value as seen by the sorter.
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    Missing,
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

impl SortValue {
    fn rank(&self) -> u8 {
        match self {
            SortValue::Missing => 0,
            SortValue::Number(_) => 1,
            SortValue::Date(_) => 2,
            SortValue::Text(_) => 3,
        }
    }

    pub fn compare(&self, other: &SortValue) -> Ordering {
        match (self, other) {
            (SortValue::Text(a), SortValue::Text(b)) => compare_text(a, b),
            (SortValue::Number(a), SortValue::Number(b)) => {
                a.partial_cmp(b).unwrap_or(Ordering::Equal)
            }
            (SortValue::Date(a), SortValue::Date(b)) => a.cmp(b),
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }
}

/// Column of a sortable table.
pub trait Column: Copy + Eq + Debug + Send + Sync + 'static {
    /// Sortable columns, in display order.
    fn all() -> &'static [Self];
    fn label(self) -> &'static str;
}

/// An entity shown in a list view.
pub trait Listable {
    type Column: Column;

    /// Text fields the filter searches.
    fn search_fields(&self) -> Vec<&str>;

    fn sort_value(&self, column: Self::Column) -> SortValue;
}

// ---------------------------------------------------------------------------
// Locale-aware text comparison
// ---------------------------------------------------------------------------

/// Primary collation key: lowercase with Spanish/Latin diacritics folded.
pub fn collation_key(s: &str) -> String {
    s.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'ä' | 'â' | 'ã' => 'a',
            'é' | 'è' | 'ë' | 'ê' => 'e',
            'í' | 'ì' | 'ï' | 'î' => 'i',
            'ó' | 'ò' | 'ö' | 'ô' | 'õ' => 'o',
            'ú' | 'ù' | 'ü' | 'û' => 'u',
            'ñ' => 'n',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

/// Compare by folded key, then by lowercase, then by raw code points, so
/// "arbol" < "árbol" < "Árbol" deterministically.
pub fn compare_text(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| b.cmp(a))
}

// ---------------------------------------------------------------------------
// Pure pipeline stages
// ---------------------------------------------------------------------------

/// Case-insensitive substring match over each item's search fields. An empty
/// query matches everything.
pub fn filter_items<'a, T: Listable>(items: &'a [T], query: &str) -> Vec<&'a T> {
    if query.is_empty() {
        return items.iter().collect();
    }
    let needle = query.to_lowercase();
    items
        .iter()
        .filter(|item| {
            item.search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Stable sort; ties keep their prior order in both directions.
pub fn sort_items<T: Listable>(items: &mut [&T], sort: SortDescriptor<T::Column>) {
    items.sort_by(|a, b| {
        let ord = a.sort_value(sort.column).compare(&b.sort_value(sort.column));
        match sort.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
}

/// `ceil(len / page_size)`, minimum 1.
pub fn page_count(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    len.div_ceil(page_size).max(1)
}

/// Slice of 1-based `page`. Out-of-range pages yield an empty slice.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let start = page.saturating_sub(1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = (start + page_size).min(items.len());
    &items[start..end]
}

// ---------------------------------------------------------------------------
// ListView
// ---------------------------------------------------------------------------

/// One screen's collection plus its transient filter/sort/page state.
#[derive(Debug, Clone)]
pub struct ListView<T: Listable> {
    items: Vec<T>,
    filter: String,
    sort: SortDescriptor<T::Column>,
    page: usize,
    page_size: usize,
}

impl<T: Listable> ListView<T> {
    pub fn new(page_size: usize, sort: SortDescriptor<T::Column>) -> Self {
        Self {
            items: Vec::new(),
            filter: String::new(),
            sort,
            page: 1,
            page_size: page_size.max(1),
        }
    }

    /// Replace the cached collection (after a fetch). The page is clamped to
    /// the new last page.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.clamp_page();
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Changing the filter always returns to page 1.
    pub fn set_filter(&mut self, filter: impl Into<String>) {
        self.filter = filter.into();
        self.page = 1;
    }

    pub fn sort(&self) -> SortDescriptor<T::Column> {
        self.sort
    }

    /// Advance the sort to the next column in `Column::all()`.
    pub fn cycle_sort_column(&mut self) {
        let all = T::Column::all();
        let idx = all.iter().position(|c| *c == self.sort.column).unwrap_or(0);
        if let Some(next) = all.get((idx + 1) % all.len().max(1)) {
            self.sort = SortDescriptor {
                column: *next,
                direction: self.sort.direction,
            };
        }
    }

    pub fn toggle_direction(&mut self) {
        self.sort.direction = self.sort.direction.toggled();
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.clamp(1, self.page_count());
    }

    pub fn next_page(&mut self) {
        self.set_page(self.page + 1);
    }

    pub fn prev_page(&mut self) {
        self.set_page(self.page.saturating_sub(1));
    }

    pub fn filtered(&self) -> Vec<&T> {
        filter_items(&self.items, &self.filter)
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered().len()
    }

    pub fn page_count(&self) -> usize {
        page_count(self.filtered_len(), self.page_size)
    }

    /// Rows of the current page: filtered, sorted, sliced.
    pub fn visible(&self) -> Vec<&T> {
        let mut rows = self.filtered();
        sort_items(&mut rows, self.sort);
        paginate(&rows, self.page, self.page_size).to_vec()
    }

    /// Display number of the `index`-th visible row.
    pub fn row_number(&self, index: usize) -> usize {
        (self.page - 1) * self.page_size + index + 1
    }

    fn clamp_page(&mut self) {
        self.page = self.page.clamp(1, self.page_count());
    }
}

// ---------------------------------------------------------------------------
// Entity bindings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamColumn {
    Name,
    Description,
}

impl Column for TeamColumn {
    fn all() -> &'static [Self] {
        &[TeamColumn::Name, TeamColumn::Description]
    }

    fn label(self) -> &'static str {
        match self {
            TeamColumn::Name => "NOMBRE",
            TeamColumn::Description => "DESCRIPCIÓN",
        }
    }
}

impl Listable for Team {
    type Column = TeamColumn;

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.description.as_str()]
    }

    fn sort_value(&self, column: TeamColumn) -> SortValue {
        match column {
            TeamColumn::Name => SortValue::Text(self.name.clone()),
            TeamColumn::Description => SortValue::Text(self.description.clone()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TournamentColumn {
    Name,
    StartDate,
    EndDate,
    TotalAmount,
    Finalized,
}

impl Column for TournamentColumn {
    fn all() -> &'static [Self] {
        &[
            TournamentColumn::Name,
            TournamentColumn::StartDate,
            TournamentColumn::EndDate,
            TournamentColumn::TotalAmount,
            TournamentColumn::Finalized,
        ]
    }

    fn label(self) -> &'static str {
        match self {
            TournamentColumn::Name => "NOMBRE",
            TournamentColumn::StartDate => "FECHA INICIO",
            TournamentColumn::EndDate => "FECHA FIN",
            TournamentColumn::TotalAmount => "MONTO",
            TournamentColumn::Finalized => "ESTADO",
        }
    }
}

impl Listable for Tournament {
    type Column = TournamentColumn;

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }

    fn sort_value(&self, column: TournamentColumn) -> SortValue {
        let date = |d: Option<NaiveDate>| d.map(SortValue::Date).unwrap_or(SortValue::Missing);
        match column {
            TournamentColumn::Name => SortValue::Text(self.name.clone()),
            TournamentColumn::StartDate => date(self.start_date),
            TournamentColumn::EndDate => date(self.end_date),
            TournamentColumn::TotalAmount => SortValue::Number(self.total_amount),
            TournamentColumn::Finalized => SortValue::Text(self.finalized.label().to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntityId;

    fn team(id: i64, name: &str, description: &str) -> Team {
        let mut t = Team::new(name, description);
        t.id = EntityId::Existing(id);
        t
    }

    fn teams(n: usize) -> Vec<Team> {
        (1..=n)
            .map(|i| team(i as i64, &format!("Equipo {i:02}"), &format!("desc {i}")))
            .collect()
    }

    fn names(rows: &[&Team]) -> Vec<String> {
        rows.iter().map(|t| t.name.clone()).collect()
    }

    #[test]
    fn filter_is_case_insensitive_over_name_and_description() {
        let items = vec![
            team(1, "Bolivia", "La Verde"),
            team(2, "Brasil", "Canarinha"),
            team(3, "Chile", "La Roja"),
        ];
        assert_eq!(names(&filter_items(&items, "BRA")), vec!["Brasil"]);
        assert_eq!(names(&filter_items(&items, "la ")), vec!["Bolivia", "Chile"]);
        assert_eq!(filter_items(&items, "").len(), 3);
        assert!(filter_items(&items, "zzz").is_empty());
    }

    #[test]
    fn filtering_is_idempotent() {
        let items = vec![
            team(1, "Bolivia", "La Verde"),
            team(2, "Brasil", "Canarinha"),
            team(3, "Chile", "La Roja"),
        ];
        for query in ["", "a", "LA", "ver", "x"] {
            let once: Vec<Team> = filter_items(&items, query).into_iter().cloned().collect();
            let twice: Vec<Team> = filter_items(&once, query).into_iter().cloned().collect();
            assert_eq!(once, twice, "query {query:?}");
        }
    }

    #[test]
    fn sort_text_folds_accents() {
        let items = vec![
            team(1, "Perú", ""),
            team(2, "Ecuador", ""),
            team(3, "Árabes", ""),
            team(4, "paraguay", ""),
        ];
        let mut rows: Vec<&Team> = items.iter().collect();
        sort_items(&mut rows, SortDescriptor::ascending(TeamColumn::Name));
        assert_eq!(names(&rows), vec!["Árabes", "Ecuador", "paraguay", "Perú"]);
    }

    #[test]
    fn reversing_direction_reverses_distinct_keys() {
        let items = vec![
            team(1, "Delta", ""),
            team(2, "alfa", ""),
            team(3, "Charlie", ""),
            team(4, "bravo", ""),
        ];
        let mut asc: Vec<&Team> = items.iter().collect();
        sort_items(&mut asc, SortDescriptor::ascending(TeamColumn::Name));
        let mut desc: Vec<&Team> = items.iter().collect();
        sort_items(
            &mut desc,
            SortDescriptor {
                column: TeamColumn::Name,
                direction: SortDirection::Descending,
            },
        );
        let mut reversed = names(&asc);
        reversed.reverse();
        assert_eq!(names(&desc), reversed);
    }

    #[test]
    fn ties_keep_prior_order_in_both_directions() {
        let items = vec![
            team(1, "Same", "first"),
            team(2, "Same", "second"),
            team(3, "Same", "third"),
        ];
        for direction in [SortDirection::Ascending, SortDirection::Descending] {
            let mut rows: Vec<&Team> = items.iter().collect();
            sort_items(
                &mut rows,
                SortDescriptor {
                    column: TeamColumn::Name,
                    direction,
                },
            );
            let order: Vec<&str> = rows.iter().map(|t| t.description.as_str()).collect();
            assert_eq!(order, vec!["first", "second", "third"]);
        }
    }

    #[test]
    fn pages_partition_the_filtered_items() {
        for n in [0usize, 1, 9, 10, 11, 25, 30] {
            let items = teams(n);
            let count = page_count(items.len(), 10);
            let sizes: Vec<usize> = (1..=count).map(|p| paginate(&items, p, 10).len()).collect();

            assert_eq!(sizes.iter().sum::<usize>(), n);
            assert!(count >= 1);
            for size in &sizes[..sizes.len() - 1] {
                assert_eq!(*size, 10);
            }
        }
    }

    #[test]
    fn page_count_minimum_one() {
        assert_eq!(page_count(0, 5), 1);
        assert_eq!(page_count(5, 5), 1);
        assert_eq!(page_count(6, 5), 2);
    }

    #[test]
    fn paginate_out_of_range_is_empty() {
        let items = teams(3);
        assert!(paginate(&items, 2, 10).is_empty());
    }

    #[test]
    fn list_view_filter_resets_page() {
        let mut view: ListView<Team> = ListView::new(10, SortDescriptor::ascending(TeamColumn::Name));
        view.set_items(teams(25));
        view.set_page(3);
        assert_eq!(view.page(), 3);

        view.set_filter("equipo 1");
        assert_eq!(view.page(), 1);
        assert_eq!(view.filtered_len(), 10);
    }

    #[test]
    fn list_view_clamps_page_when_items_shrink() {
        let mut view: ListView<Team> = ListView::new(10, SortDescriptor::ascending(TeamColumn::Name));
        view.set_items(teams(30));
        view.set_page(3);
        view.set_items(teams(12));
        assert_eq!(view.page(), 2);

        view.set_page(99);
        assert_eq!(view.page(), 2);
        view.set_page(0);
        assert_eq!(view.page(), 1);
    }

    #[test]
    fn list_view_visible_rows_and_numbering() {
        let mut view: ListView<Team> = ListView::new(10, SortDescriptor::ascending(TeamColumn::Name));
        view.set_items(teams(15).into_iter().rev().collect());
        view.next_page();

        let rows = view.visible();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].name, "Equipo 11");
        assert_eq!(view.row_number(0), 11);
        assert_eq!(view.row_number(4), 15);
    }

    #[test]
    fn cycling_columns_keeps_direction() {
        let mut view: ListView<Team> = ListView::new(10, SortDescriptor::ascending(TeamColumn::Name));
        view.toggle_direction();
        assert_eq!(view.sort().direction, SortDirection::Descending);
        view.cycle_sort_column();
        assert_eq!(
            view.sort(),
            SortDescriptor {
                column: TeamColumn::Description,
                direction: SortDirection::Descending,
            }
        );
        view.cycle_sort_column();
        assert_eq!(view.sort().column, TeamColumn::Name);
    }

    #[test]
    fn tournaments_sort_by_date_with_missing_first() {
        let base = Tournament {
            id: EntityId::Existing(1),
            name: "A".into(),
            start_date: None,
            end_date: None,
            total_amount: 0.0,
            per_round_amount: 0.0,
            per_pool_amount: 0.0,
            finalized: Default::default(),
            last_edited_by: None,
        };
        let mut late = base.clone();
        late.name = "late".into();
        late.start_date = NaiveDate::from_ymd_opt(2026, 6, 1);
        let mut early = base.clone();
        early.name = "early".into();
        early.start_date = NaiveDate::from_ymd_opt(2024, 6, 1);
        let mut missing = base;
        missing.name = "missing".into();

        let items = vec![late, missing, early];
        let mut rows: Vec<&Tournament> = items.iter().collect();
        sort_items(&mut rows, SortDescriptor::ascending(TournamentColumn::StartDate));
        let order: Vec<&str> = rows.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(order, vec!["missing", "early", "late"]);
    }
}
