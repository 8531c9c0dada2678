pub mod contact;
pub mod donations;
pub mod events;
pub mod newsletter;
pub mod profiles;
pub mod programs;
pub mod projects;
pub mod settings;
pub mod stats;
