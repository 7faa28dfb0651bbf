mod assets;
mod routes;

pub use routes::{router, serve, AppState};
