pub mod audit;
pub mod auth;
pub mod category;
pub mod dispatch;
pub mod schema;
pub mod shared;
pub mod status;
pub mod template;
pub mod watch;
