//! Opening hours service.
//!
//! Fetches a business's opening hours from Google Places, caches them, and
//! renders a Monday-to-Sunday list with each day's date and today
//! highlighted.

pub mod cache;
pub mod config;
pub mod places;
pub mod shortcode;
pub mod web;
pub mod week;
