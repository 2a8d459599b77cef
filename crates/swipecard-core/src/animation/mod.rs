#![forbid(unsafe_code)]

//! Motion for the swipe surface.
//!
//! [`Spring`] is the physics primitive; [`SpringDriver`] pairs two springs
//! (offset and opacity) behind the [`AnimationDriver`] trait the widget
//! layer consumes. Hosts with their own tween engine implement the trait
//! instead.

pub mod driver;
pub mod spring;

pub use driver::{AnimationDriver, DriverTick, SpringDriver};
pub use spring::{Spring, SpringConfig};
