pub mod health;
pub mod interaction;
pub mod noc_status;
