pub mod config;
pub mod controller;
pub mod game_manager;
