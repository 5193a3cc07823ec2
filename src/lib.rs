pub mod city;
pub mod config;
pub mod filter;
pub mod loader;
pub mod output;
pub mod stats;
pub mod table;
