#[cfg(test)]
use crate::prelude::*;

pub mod entity;
pub mod ids;
pub mod project;
pub mod reflection;
pub mod system;
pub mod world;

pub use entity::{Component, Entity};
pub use project::Project;
pub use system::System;
pub use world::World;
