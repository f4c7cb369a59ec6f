pub mod server;

pub use server::{create_router, ChainDispatcher, SolveRequest, SolveResponse};
