pub mod grid;
pub mod render;
pub mod timestamp;

pub use grid::{build_month_grid, DayCell, ItemKind, MonthGrid, SkippedItem, WeekRow};
pub use timestamp::Zone;
