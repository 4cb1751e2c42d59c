pub mod dob;
pub mod headshot;
pub mod name;

pub use dob::DobMatcher;
pub use headshot::HeadshotMatcher;
pub use name::NameMatcher;
