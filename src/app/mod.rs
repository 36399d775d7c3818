pub mod app;
pub mod portfolio;
pub mod ui;
pub mod utils;

pub use app::{App, Screen};
pub use portfolio::{NewAsset, Portfolio};
