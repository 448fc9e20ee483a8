mod database;
mod state_builder;

pub use state_builder::{assemble_state, build_app_state};
