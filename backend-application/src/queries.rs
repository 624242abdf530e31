pub mod download_queries;
