pub mod assignment;
pub mod bookings;
pub mod notify;
