pub mod crud;
pub mod technicians;
