//! Terminal UI for playing against a bot.

mod app;
mod board_widget;
mod game_view;

pub use app::App;
