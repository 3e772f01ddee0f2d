pub mod build;
pub mod init;
pub mod routes;
pub mod serve;
pub mod translations;
pub mod validate;
