// Aggregation engine: read-only summaries recomputed from the full
// application collection on every request.

pub mod handlers;
pub mod monthly;
pub mod overview;
