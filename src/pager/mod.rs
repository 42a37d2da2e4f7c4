// src/pager/mod.rs
// =============================================================================
// The interactive (paged) variant of `find`.
//
// Submodules:
// - control: keystrokes -> NextPage / Quit
// - session: the pagination driver and the pager process around it
// =============================================================================

mod control;
mod session;

pub use session::run_session;
