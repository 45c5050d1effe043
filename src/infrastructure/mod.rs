pub mod crypto;
pub mod db;
pub mod geocoding;
pub mod storage;
