// HTTP API for the voice platform

pub mod skill;

pub use skill::{create_skill_router, SkillAppState};
