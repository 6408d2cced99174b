/// Demo page.
pub mod home;
/// Fallback page.
pub mod not_found;
