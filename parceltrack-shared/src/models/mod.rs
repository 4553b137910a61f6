/// Domain models for parceltrack
///
/// # Models
///
/// - `user`: user accounts and the registration/update input shapes
/// - `tracker`: tracking codes and their shipment events

pub mod tracker;
pub mod user;
