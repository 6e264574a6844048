pub mod a001_professional;
pub mod a002_order;
pub mod a003_booth;
