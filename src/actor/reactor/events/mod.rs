pub mod position;
pub mod settings;
pub mod window;
pub mod workspace;
