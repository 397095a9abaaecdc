pub mod by_team;
pub mod crud;
