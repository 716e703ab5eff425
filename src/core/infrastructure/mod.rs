pub mod api_client;
pub mod token_manager;
