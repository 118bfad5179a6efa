/// Growth frontier ordered by priority with FIFO ties
pub mod frontier;
/// Growth engine state machine and priority heuristics
pub mod growth;
/// Seeded palette construction and nearest-color sampling
pub mod palette;
/// Effective run parameters for previews and exports
pub mod profile;
/// Time-boxed slices, progress reporting and result delivery
pub mod scheduler;
/// Background worker thread and its command protocol
pub mod worker;
