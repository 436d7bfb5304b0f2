mod client;
mod http_client;
mod request;
mod response;

pub use client::RpcClient;
pub use request::CallEnvelope;
