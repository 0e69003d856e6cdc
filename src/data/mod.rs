pub mod bar;
pub mod loader;
pub mod slice;

pub use bar::{Bar, BarError};
pub use loader::{filter_by_time_range, filter_by_roots, load_csv};
pub use slice::{build_slices, DataSlice};
