pub mod config;
pub mod db;
pub mod game;
pub mod http_api;
pub mod oracle;
pub mod service;

#[cfg(test)]
mod test_utils;
