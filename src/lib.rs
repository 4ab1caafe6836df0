pub mod api;
pub mod config;
pub mod errors;
pub mod events;
pub mod history;
pub mod linker;
pub mod lookup;
pub mod notify;
pub mod pagination;
pub mod session;
pub mod settings;
pub mod timestamps;
pub mod ui;
pub mod users;
pub mod wizard;
