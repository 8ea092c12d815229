pub mod audio;
pub mod models;
pub mod notification;
pub mod screen;
pub mod ui;
