pub mod avatar;
pub mod sqlite_store;
