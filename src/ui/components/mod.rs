pub mod calendar_view;
pub mod progress_bar;
pub mod quote_board;
pub mod stats_panel;
