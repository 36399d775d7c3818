pub mod app;
pub mod db;
pub mod engine;
pub mod models;
pub mod snapshot;

#[cfg(test)]
mod test;
