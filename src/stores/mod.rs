pub mod collection;
pub mod detail;
pub mod filter;

use std::sync::atomic::{AtomicU64, Ordering};

pub use collection::{TripCollection, TripCollectionStore};
pub use detail::{TripDetail, TripDetailStore};
pub use filter::{filter_by_month, InvalidMonth, MonthFilter};

/// `Idle -> Loading -> {Loaded, Failed}`; a new load always re-enters `Loading`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed,
}

/// Hands out increasing tickets so only the newest load may publish.
#[derive(Debug, Default)]
struct LoadTickets(AtomicU64);

impl LoadTickets {
    fn issue(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.0.load(Ordering::SeqCst) == ticket
    }
}
