pub mod in_memory_user_repository;
#[cfg(test)]
pub mod mock_db;
pub mod user_repository;
