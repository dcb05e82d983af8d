// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod html_mapper;
pub mod http_response;
pub mod influx_repository;
pub mod logging;
pub mod templates;
