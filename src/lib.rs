pub mod config;
pub mod format;
pub mod map;
pub mod position;
pub mod session;
pub mod terminator;
pub mod track;
pub mod web;
