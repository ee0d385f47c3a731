pub mod app;
pub mod draw;
pub mod terminal;

pub use app::{run_interactive, run_once, run_plain, App};
