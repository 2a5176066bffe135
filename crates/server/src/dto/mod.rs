mod favourite;
mod stop_time;

pub use favourite::*;
pub use stop_time::*;
