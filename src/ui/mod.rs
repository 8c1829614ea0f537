mod app;
mod day_of_week;
mod theme;
mod timeline;
mod tree_view;
mod views;

pub use app::ProfileEditorApp;
pub use theme::{setup_fonts, setup_theme};
