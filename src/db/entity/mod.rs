pub mod bettors;
pub mod events;
pub mod fixed_assignments;
pub mod payments;
pub mod sea_orm_active_enums;
pub mod slots;
pub mod tickets;
pub mod users;
