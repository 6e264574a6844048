pub mod buckets;
pub mod column;
pub mod fuzzy;
pub mod retry;
pub mod row;
pub mod search;
pub mod time_window;
