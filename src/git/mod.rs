pub mod log;
pub mod repository;

pub use log::{construct_log_command, LogCommand};
pub use repository::GitRepository;
