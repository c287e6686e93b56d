pub mod credentials;
pub mod entities;
pub mod phone;
