pub mod convert;
pub mod doctor;
