pub mod init;
pub mod store;
