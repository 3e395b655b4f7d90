pub mod candidates;
pub mod change;
pub mod chips;
pub mod digest;
pub mod dispatch;
pub mod evaluate;
pub mod parse;
pub mod reconcile;
pub mod snapshot;
pub mod windows;
