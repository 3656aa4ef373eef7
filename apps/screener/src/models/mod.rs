pub mod candidate;
pub mod job;

pub use candidate::{CandidateProfile, ResumeDocument};
pub use job::JobRequirement;
