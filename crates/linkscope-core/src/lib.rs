pub mod config;
pub mod logging;

pub mod control;
pub mod expand;
pub mod heuristics;
pub mod inspect;
pub mod probe;
pub mod resolver;
pub mod shortener;
pub mod url_model;
