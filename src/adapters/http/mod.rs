//! HTTP adapters.

pub mod customers;

pub use customers::CustomersHttpServer;
