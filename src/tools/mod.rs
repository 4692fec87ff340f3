pub mod lookup;
pub mod reload;
pub mod search;
pub mod stats;

pub use lookup::*;
pub use reload::*;
pub use search::*;
pub use stats::*;
