pub mod api_types;
pub mod types;
pub mod upstream;
