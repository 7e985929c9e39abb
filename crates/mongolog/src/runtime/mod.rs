//! Runtime module. Boots the process, then runs the pipeline.

pub mod boot;
pub mod run;
