pub mod team;

pub mod bundles;

pub mod config;

pub mod game_snapshot;
