//! Состояние таблицы: сортировка, фильтры, страница, выделение
//!
//! The state never touches the rows it is applied to. [`TableState::view`] works on
//! indices into the caller's slice: filters first, then the sort over the filtered
//! set, then the page slice. Everything here is plain data so it can be tested
//! without a browser.

use contracts::shared::column::ColumnDef;
use contracts::shared::fuzzy;
use contracts::shared::row::{CellValue, Row};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// Допустимые размеры страницы
pub const PAGE_SIZE_OPTIONS: [usize; 4] = [10, 20, 30, 50];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub column_id: String,
    pub direction: SortDirection,
}

/// Result of applying the state to a dataset
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableView {
    /// Rows left after column and global filters
    pub filtered_count: usize,
    /// Effective (clamped) page index
    pub page: usize,
    pub page_count: usize,
    /// Indices into the source rows for the visible page, in display order
    pub row_indices: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableState {
    pub sort: Option<SortSpec>,
    pub column_filters: BTreeMap<String, String>,
    pub global_filter: String,
    pub page: usize,
    pub page_size: usize,
    pub selected: BTreeSet<String>,
    dataset_key: Option<String>,
}

impl Default for TableState {
    fn default() -> Self {
        Self {
            sort: None,
            column_filters: BTreeMap::new(),
            global_filter: String::new(),
            page: 0,
            page_size: PAGE_SIZE_OPTIONS[0],
            selected: BTreeSet::new(),
            dataset_key: None,
        }
    }
}

/// Number of pages for `total` rows; an empty table still has one (empty) page
pub fn page_count(total: usize, page_size: usize) -> usize {
    let size = page_size.max(1);
    total.div_ceil(size).max(1)
}

impl TableState {
    /// Клик по заголовку: asc -> desc -> без сортировки.
    /// Другая колонка всегда начинает с asc.
    pub fn toggle_sort(&mut self, column_id: &str) {
        self.sort = match self.sort.take() {
            Some(spec) if spec.column_id == column_id => match spec.direction {
                SortDirection::Asc => Some(SortSpec {
                    direction: SortDirection::Desc,
                    ..spec
                }),
                SortDirection::Desc => None,
            },
            _ => Some(SortSpec {
                column_id: column_id.to_string(),
                direction: SortDirection::Asc,
            }),
        };
    }

    pub fn sort_direction(&self, column_id: &str) -> Option<SortDirection> {
        self.sort
            .as_ref()
            .filter(|spec| spec.column_id == column_id)
            .map(|spec| spec.direction)
    }

    /// Empty value removes the filter. Any filter change goes back to the first page.
    pub fn set_column_filter(&mut self, column_id: &str, value: &str) {
        if value.trim().is_empty() {
            self.column_filters.remove(column_id);
        } else {
            self.column_filters
                .insert(column_id.to_string(), value.to_string());
        }
        self.page = 0;
    }

    pub fn column_filter(&self, column_id: &str) -> &str {
        self.column_filters
            .get(column_id)
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn set_global_filter(&mut self, query: &str) {
        self.global_filter = query.to_string();
        self.page = 0;
    }

    /// Accepts only sizes from [`PAGE_SIZE_OPTIONS`]; returns false otherwise
    pub fn set_page_size(&mut self, size: usize) -> bool {
        if !PAGE_SIZE_OPTIONS.contains(&size) {
            return false;
        }
        self.page_size = size;
        self.page = 0;
        true
    }

    /// Переход на страницу с ограничением в `[0, last]`.
    ///
    /// `total_rows` is the filtered row count. Returns the page actually set.
    pub fn set_page(&mut self, requested: i64, total_rows: usize) -> usize {
        let last = page_count(total_rows, self.page_size) - 1;
        self.page = if requested <= 0 {
            0
        } else {
            usize::try_from(requested).map_or(last, |page| page.min(last))
        };
        self.page
    }

    pub fn is_selected(&self, key: &str) -> bool {
        self.selected.contains(key)
    }

    pub fn set_selected(&mut self, key: &str, selected: bool) {
        if selected {
            self.selected.insert(key.to_string());
        } else {
            self.selected.remove(key);
        }
    }

    pub fn toggle_selected(&mut self, key: &str) {
        let selected = !self.is_selected(key);
        self.set_selected(key, selected);
    }

    /// Selected rows in source order. Keys of rows no longer present are ignored.
    pub fn selected_rows<'a, R: Row>(&self, rows: &'a [R]) -> Vec<&'a R> {
        rows.iter()
            .filter(|row| {
                row.row_key()
                    .map(|key| self.selected.contains(&key))
                    .unwrap_or(false)
            })
            .collect()
    }

    /// Сброс фильтров, сортировки, страницы и выделения. Размер страницы сохраняется.
    pub fn reset(&mut self) {
        *self = Self {
            page_size: self.page_size,
            dataset_key: self.dataset_key.take(),
            ..Self::default()
        };
    }

    /// Resets the state when the table is pointed at a different dataset.
    /// Returns true when a reset happened.
    pub fn observe_dataset(&mut self, key: &str) -> bool {
        match self.dataset_key.as_deref() {
            Some(current) if current == key => false,
            Some(_) => {
                self.reset();
                self.dataset_key = Some(key.to_string());
                true
            }
            None => {
                self.dataset_key = Some(key.to_string());
                false
            }
        }
    }

    fn passes_filters<R: Row>(&self, row: &R, columns: &[ColumnDef]) -> bool {
        let columns_ok = self.column_filters.iter().all(|(column_id, value)| {
            columns
                .iter()
                .find(|column| column.id == *column_id && column.filterable)
                .map(|column| fuzzy::matches_column(row, column, value))
                .unwrap_or(true)
        });
        columns_ok && fuzzy::matches(row, columns, &self.global_filter)
    }

    /// Filtered, sorted and paged indices into `rows`
    pub fn view<R: Row>(&self, rows: &[R], columns: &[ColumnDef]) -> TableView {
        let mut indices: Vec<usize> = rows
            .iter()
            .enumerate()
            .filter(|(_, row)| self.passes_filters(*row, columns))
            .map(|(index, _)| index)
            .collect();

        if let Some(spec) = &self.sort {
            if let Some(column) = columns
                .iter()
                .find(|column| column.id == spec.column_id && column.sortable)
            {
                indices.sort_by(|&a, &b| {
                    compare_for_sort(
                        rows[a].field(&column.accessor),
                        rows[b].field(&column.accessor),
                        spec.direction,
                    )
                });
            }
        }

        let filtered_count = indices.len();
        let page_count = page_count(filtered_count, self.page_size);
        let page = self.page.min(page_count - 1);
        let row_indices = indices
            .into_iter()
            .skip(page * self.page_size)
            .take(self.page_size)
            .collect();

        TableView {
            filtered_count,
            page,
            page_count,
            row_indices,
        }
    }
}

// Пустые значения всегда в конце, в обоих направлениях
fn compare_for_sort(
    a: Option<CellValue>,
    b: Option<CellValue>,
    direction: SortDirection,
) -> Ordering {
    let a = a.filter(|value| !value.is_null());
    let b = b.filter(|value| !value.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => match direction {
            SortDirection::Asc => a.compare(&b),
            SortDirection::Desc => a.compare(&b).reverse(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn columns() -> Vec<ColumnDef> {
        vec![
            ColumnDef::new("name", "Name"),
            ColumnDef::new("status", "Status"),
            ColumnDef::new("total", "Total"),
            ColumnDef::new("client", "Client")
                .accessor("client.name")
                .not_sortable(),
        ]
    }

    fn rows(n: usize) -> Vec<Value> {
        (0..n)
            .map(|i| json!({"id": format!("r{}", i), "name": format!("Row {:02}", i), "total": i}))
            .collect()
    }

    fn names(rows: &[Value], view: &TableView) -> Vec<String> {
        view.row_indices
            .iter()
            .map(|&i| rows[i]["name"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn test_sort_cycle() {
        let mut state = TableState::default();
        state.toggle_sort("name");
        assert_eq!(state.sort_direction("name"), Some(SortDirection::Asc));
        state.toggle_sort("name");
        assert_eq!(state.sort_direction("name"), Some(SortDirection::Desc));
        state.toggle_sort("name");
        assert_eq!(state.sort, None);

        // single-column: switching column restarts at asc
        state.toggle_sort("name");
        state.toggle_sort("name");
        state.toggle_sort("total");
        assert_eq!(state.sort_direction("name"), None);
        assert_eq!(state.sort_direction("total"), Some(SortDirection::Asc));
    }

    #[test]
    fn test_sort_numeric_and_missing_last() {
        let data = vec![
            json!({"id": "a", "name": "A", "total": 10}),
            json!({"id": "b", "name": "B"}),
            json!({"id": "c", "name": "C", "total": 2}),
        ];
        let mut state = TableState::default();
        state.toggle_sort("total");
        assert_eq!(names(&data, &state.view(&data, &columns())), vec!["C", "A", "B"]);
        state.toggle_sort("total");
        assert_eq!(names(&data, &state.view(&data, &columns())), vec!["A", "C", "B"]);
    }

    #[test]
    fn test_sort_mixed_number_and_text_column() {
        let data = vec![
            json!({"id": "a", "name": "A", "total": 100}),
            json!({"id": "b", "name": "B", "total": "75.5"}),
            json!({"id": "c", "name": "C", "total": 40}),
            json!({"id": "d", "name": "D", "total": "n/a"}),
            json!({"id": "e", "name": "E", "total": null}),
        ];
        let mut state = TableState::default();
        state.toggle_sort("total");
        assert_eq!(
            names(&data, &state.view(&data, &columns())),
            vec!["C", "B", "A", "D", "E"]
        );
        state.toggle_sort("total");
        assert_eq!(
            names(&data, &state.view(&data, &columns())),
            vec!["D", "A", "B", "C", "E"]
        );
    }

    #[test]
    fn test_unsortable_column_keeps_source_order() {
        let data = vec![
            json!({"id": "a", "name": "A", "client": {"name": "Zed"}}),
            json!({"id": "b", "name": "B", "client": {"name": "Amy"}}),
        ];
        let mut state = TableState::default();
        state.toggle_sort("client");
        assert_eq!(names(&data, &state.view(&data, &columns())), vec!["A", "B"]);
    }

    #[test]
    fn test_filters_apply_before_pagination() {
        let data = rows(25);
        let mut state = TableState::default();
        state.set_page(2, data.len());
        state.set_global_filter("row 1");
        let view = state.view(&data, &columns());
        // "Row 1", "Row 10".."Row 19"
        assert_eq!(view.filtered_count, 10);
        assert_eq!(view.page, 0);
        assert_eq!(view.row_indices.len(), 10);
    }

    #[test]
    fn test_column_filter() {
        let data = vec![
            json!({"id": "a", "name": "Alice", "status": "Active"}),
            json!({"id": "b", "name": "Bob", "status": "Inactive"}),
        ];
        let mut state = TableState::default();
        state.set_column_filter("name", "bo");
        assert_eq!(names(&data, &state.view(&data, &columns())), vec!["Bob"]);

        state.set_column_filter("name", "  ");
        assert!(state.column_filters.is_empty());

        state.set_column_filter("status", "activ");
        assert_eq!(state.view(&data, &columns()).filtered_count, 2);
    }

    #[test]
    fn test_page_bounds_clamp() {
        let data = rows(45);
        let mut state = TableState::default();
        let last = page_count(data.len(), state.page_size) - 1;
        assert_eq!(last, 4);

        assert_eq!(state.set_page(-1, data.len()), 0);
        assert_eq!(names(&data, &state.view(&data, &columns()))[0], "Row 00");

        assert_eq!(state.set_page(last as i64 + 5, data.len()), last);
        let view = state.view(&data, &columns());
        assert_eq!(view.page, last);
        assert_eq!(view.row_indices.len(), 5);
    }

    #[test]
    fn test_page_size_options() {
        let mut state = TableState::default();
        state.set_page(3, 100);
        assert!(state.set_page_size(30));
        assert_eq!(state.page, 0);
        assert!(!state.set_page_size(25));
        assert_eq!(state.page_size, 30);
    }

    #[test]
    fn test_empty_data_single_empty_page() {
        let data: Vec<Value> = Vec::new();
        let view = TableState::default().view(&data, &columns());
        assert_eq!(view.page_count, 1);
        assert!(view.row_indices.is_empty());
    }

    #[test]
    fn test_selection_survives_sort_and_filter() {
        let data = rows(12);
        let mut state = TableState::default();
        state.set_selected("r11", true);
        state.toggle_selected("r3");
        state.toggle_sort("total");
        state.toggle_sort("total");
        state.set_global_filter("row 0");

        let selected: Vec<&str> = state
            .selected_rows(&data)
            .iter()
            .filter_map(|row| row["id"].as_str())
            .collect();
        assert_eq!(selected, vec!["r3", "r11"]);
    }

    #[test]
    fn test_observe_dataset_resets_on_swap() {
        let mut state = TableState::default();
        assert!(!state.observe_dataset("orders"));
        state.set_page_size(50);
        state.toggle_sort("name");
        state.set_selected("r1", true);
        assert!(!state.observe_dataset("orders"));
        assert!(state.sort.is_some());

        assert!(state.observe_dataset("professionals"));
        assert_eq!(state.sort, None);
        assert!(state.selected.is_empty());
        assert_eq!(state.page_size, 50);
    }

    #[test]
    fn test_view_does_not_touch_source() {
        let data = rows(3);
        let before = data.clone();
        let mut state = TableState::default();
        state.toggle_sort("name");
        state.toggle_sort("name");
        let _ = state.view(&data, &columns());
        assert_eq!(data, before);
    }
}
