//! Exchange outcomes and dispatch work items.

pub mod outcome;
pub mod work_item;

pub use outcome::{ExchangeOutcome, Stage};
pub use work_item::WorkItem;
