//! Domain models: properties and viewing schedules

pub mod property;
pub mod schedule;

pub use property::{
    ImageRef, Location, MAX_IMAGES, NewProperty, Property, PropertyPatch, PropertyQuery,
    PropertyStatus, PropertyType,
};
pub use schedule::{NewSchedule, Schedule, ScheduleStatus};
