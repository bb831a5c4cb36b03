pub mod connection;
pub mod schema;
pub mod settings;

pub use connection::Database;
pub use settings::setting_key;
