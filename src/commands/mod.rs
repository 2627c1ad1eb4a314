pub mod backup;
pub mod configure;
pub mod database;
pub mod server;
pub mod update;
