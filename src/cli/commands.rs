pub mod create_superuser;
pub mod initdb;
pub mod serve;
pub mod wait_db;

pub use create_superuser::create_superuser;
pub use initdb::init_database;
pub use serve::serve;
pub use wait_db::wait_for_database;
