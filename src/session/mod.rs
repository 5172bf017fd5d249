/// Host animation frame queue.
pub mod scheduler;
/// Transition engine and per-transition sessions.
pub mod transition;
