// ── Polling cache ──
//
// Rate-limited, lock-free snapshot cache shared by every accessory facet.

mod cache;
mod refresh;

pub use cache::PollingCache;
pub use refresh::FetchOutcome;
