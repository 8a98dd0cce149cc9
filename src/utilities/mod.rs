pub mod app_state;
pub mod config;
pub mod errors;
pub mod jwt;
pub mod multipart;

#[cfg(test)]
pub mod test_support;
