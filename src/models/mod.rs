pub mod calendar;
pub mod photo;
pub mod response;
pub mod song;
