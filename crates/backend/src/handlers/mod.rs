pub mod a003_booth;
pub mod collections;
