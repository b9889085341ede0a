// Scheduler module - paced add/remove cycle between tilings

pub mod placement;
pub mod queue;
pub mod tiling;

pub use placement::{first_addable_block, largest_addable_block, next_addable_block};
pub use queue::{Action, Clock, SequentialQueue, ThreadClock, VirtualClock};
pub use tiling::{CycleState, Phase, SchedulerStats, Stage, TilingScheduler};
