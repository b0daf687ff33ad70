pub mod config;
pub mod menu;
pub mod output;
pub mod recipes;
pub mod rpc;
pub mod server;
pub mod tools;
