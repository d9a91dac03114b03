pub mod assets;
pub mod boxes;
pub mod colors;
pub mod common;
pub mod compositor;
pub mod errors;
pub mod export;
pub mod generate_commands;
pub mod inquiry;
pub mod plan;
pub mod plan_execution;
pub mod print_areas;
pub mod registry;
pub mod session;
pub mod storage;
pub mod upload;
