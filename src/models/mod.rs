pub mod booking;
pub mod hours;
pub mod notification;
pub mod service;
pub mod user;

pub use booking::{Booking, BookingDetail, BookingStatus};
pub use hours::{DayHours, TimeOfDay};
pub use notification::{NewNotification, Notification};
pub use service::Service;
pub use user::{Actor, Role, User};
