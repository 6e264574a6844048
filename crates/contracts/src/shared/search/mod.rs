pub mod criterion;
pub mod evaluate;
pub mod session;

pub use criterion::*;
pub use evaluate::*;
pub use session::*;
