pub mod detector;
pub mod profile;
pub mod rules;

pub use detector::ClientDetector;
pub use profile::ClientProfile;
