pub mod auth;
pub mod equipment;
pub mod notifications;
pub mod profiles;
pub mod references;
pub mod requests;
pub mod teams;
pub mod write_error;
