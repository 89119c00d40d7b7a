// Infrastructure adapters implementing the application ports

pub mod dns;
pub mod http_client;
