pub mod equipment;
pub mod notification;
pub mod request;
pub mod team;
