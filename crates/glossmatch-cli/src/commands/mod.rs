pub mod init;
pub mod play;
pub mod signature;
pub mod validate;
