mod common;
mod public;
mod shortcode;
