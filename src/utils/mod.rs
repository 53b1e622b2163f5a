pub mod password;
pub mod session_token;
