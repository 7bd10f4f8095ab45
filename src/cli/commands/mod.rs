mod destroy;
mod init;
mod status;

pub use destroy::execute_destroy;
pub use init::execute_init;
pub use status::execute_status;
