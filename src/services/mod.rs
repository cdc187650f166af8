// Tabstash services
// Capture, restore and the helpers they share: display selection, URL policy,
// snapshot identity and user preferences.

pub mod capture;
pub mod display_locator;
pub mod identity;
pub mod preferences_engine;
pub mod restore;
pub mod url_policy;
