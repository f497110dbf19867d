pub mod app;
pub mod config;
pub mod directors;
pub mod error;
pub mod models;
pub mod movie;
pub mod search;
pub mod tmdb;
pub mod watchlist;
