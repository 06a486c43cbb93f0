mod build;
mod watch;

pub use build::build;
pub use watch::watch;
