pub mod app;
pub mod input;
pub mod picker;
pub mod quick_menu;
pub mod render;
pub mod session;
pub mod table;
pub mod theme;

pub use app::run;
