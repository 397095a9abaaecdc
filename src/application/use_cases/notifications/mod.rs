pub mod crud;
pub mod mark_read;
