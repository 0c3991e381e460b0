pub mod fragment_client;
