pub mod data_table;
pub mod sortable_header_cell;
pub mod state;

pub use data_table::{CellRenderer, DataTable, TableColumn};
pub use sortable_header_cell::SortableHeaderCell;
pub use state::{SortDirection, TableState, TableView, PAGE_SIZE_OPTIONS};
