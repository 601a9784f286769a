// Adapters layer: concrete implementations of the domain ports.

pub mod http;
pub mod observer;

pub use http::ReqwestTransport;
pub use observer::TracingObserver;
