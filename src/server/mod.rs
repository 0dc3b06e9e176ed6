pub mod ban_store;
pub mod identifier;
pub mod server_list;
