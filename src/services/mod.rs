pub mod database;
pub mod image_url;
pub mod keepalive;
pub mod storage;
