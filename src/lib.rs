pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod services;
pub mod state;

pub use services::dialogue::{advance, Advance, DialogueError, DialogueState, Planner};
