pub mod admin;
pub mod calendar;
pub mod custom_hours;
pub mod exams;
pub mod feeds;
pub mod friends;
pub mod rooms;
pub mod zenturien;
