pub mod app_banner;
pub mod color_picker;
pub mod feedback_form;
pub mod handoff_panel;
pub mod oauth_buttons;
pub mod star_rating;
pub mod terpene_sheet;
