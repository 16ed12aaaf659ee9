pub mod audit;
pub mod auth;
pub mod category;
pub mod template;

pub use audit::AuditCommands;
pub use auth::AuthCommands;
pub use category::CategoryCommands;
pub use template::TemplateCommands;
