pub mod upload_commands;
