//! Terminal frontend: a menu for table settings and the table itself.

pub mod app;
pub mod controller;
pub mod logger;
pub mod ui;
