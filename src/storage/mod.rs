pub mod layout;
pub mod file_lock;
pub mod blocks;
pub mod records;
pub mod ancestry;
pub mod meta;
pub mod update;
