//! Domain models shared between the store, the HTTP layer and email rendering

pub mod content;
pub mod registration;

pub use content::{Brochure, TeamMember, TimelineEvent};
pub use registration::{
    EventDetail, NewRegistration, PaymentStatus, Registration, RegistrationDetail,
    RegistrationState, SelectedEventName,
};
