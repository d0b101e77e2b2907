pub mod admin;
pub mod shortcode;
