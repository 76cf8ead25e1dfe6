//! Bookings and their admin notifications.

pub mod entities;
pub mod notification;
pub mod repository;
