pub mod equipment_repository;
pub mod errors;
pub mod notification_repository;
pub mod request_repository;
pub mod team_repository;
pub mod user_repository;
