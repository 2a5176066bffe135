pub mod agency;
pub mod day;
pub mod time;

pub use agency::*;
pub use day::*;
pub use time::*;
