//! View state for the listing, detail and creation screens.

pub mod create;
pub mod detail;
pub mod list;

#[cfg(test)]
#[path = "../tests/views_tests.rs"]
mod tests;
