pub mod credentials;
pub mod observability;
pub mod storage;
