pub mod create_request;
pub mod kanban;
pub mod list_requests;
pub mod notify;
pub mod summary;
pub mod update_request;
