//! Swaying tree-branch physics for a vertical platformer.
//!
//! `canopy` simulates branches as tapered ladder trusses of Verlet nodes held
//! together by distance constraints, and couples them two ways with a
//! player body that lands on, bends, and bounces off them.
//!
//! # Features
//!
//! - **Truss branches**: top/bottom rails with vertical and diagonal braces,
//!   a fixed root and a linear taper
//! - **Substepped solver**: damped Verlet integration plus iterative
//!   relaxation, with one `stiffness` knob driving both correction strength
//!   and iteration count
//! - **Two-way contact**: circle-vs-segment resolution that pushes the rail
//!   nodes and the player apart and reflects the player's velocity
//! - **Player controller**: instant horizontal control, variable-height
//!   jump, breeze drift, static-platform landing
//! - **Falling leaves**: breeze-driven background decoration
//! - **Observable**: watch substeps, contacts and landings via `StepObserver`
//! - **`no_std` compatible**: `alloc` only; math through `libm`
//!
//! # Tick order
//!
//! Player movement and contact resolution happen before the branch solver
//! runs, so contact dents are relaxed within the same tick. [`World::step`]
//! enforces this; callers driving the pieces by hand should do the same.

#![no_std]

extern crate alloc;

pub mod float;
pub mod vec;
pub mod node;
pub mod constraint;
pub mod branch;
pub mod collision;
pub mod player;
pub mod platform;
pub mod hazard;
pub mod breeze;
pub mod leaf;
pub mod drawable;
pub mod world;
pub mod observer;
pub mod config;
pub mod error;

// Re-export primary API
pub use float::Float;
pub use vec::{Vec, Vec2};
pub use node::Node;
pub use constraint::DistanceConstraint;
pub use branch::{create_branch, Branch, BranchSpec, RailSegment};
pub use collision::{closest_point_on_segment, resolve_branch_contacts, segment_contact, Contact};
pub use player::{Buttons, JumpState, PlayerBody, PlayerStep};
pub use platform::{Rect, StaticPlatform};
pub use hazard::Patroller;
pub use breeze::breeze_strength;
pub use leaf::{Leaf, LeafRng, LEAF_COUNT};
pub use drawable::{DrawItem, Drawable, EntityKind, Facing};
pub use world::{StepReport, World};
pub use config::{CollisionConfig, PlayerConfig, SimulationConfig};
pub use observer::{NoOpStepObserver, RecordingObserver, StepObserver};
pub use error::PhysicsError;
