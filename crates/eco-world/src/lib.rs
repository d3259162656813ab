//! Toy simulation engine.
//!
//! The food chain grid automaton, the morphing shapes of the rain toy, the
//! spilling paint circles, and the playground that hosts one of them at a time.

pub mod automaton;
pub mod behavior;
pub mod circles;
pub mod controls;
pub mod goals;
pub mod grid;
pub mod morph;
pub mod paint;
pub mod rain;
pub mod toy;

pub use automaton::{FoodChain, FoodChainSnapshot};
pub use behavior::TickStats;
pub use circles::{Circle, CircleField, CircleState, CircleView, Coverage};
pub use goals::{Celebration, GoalSet, PaintGoal, RainGoal};
pub use grid::{CellView, Grid, SpeciesCounts};
pub use morph::{MorphState, Morphable};
pub use paint::{PaintSnapshot, SpillingPaint};
pub use rain::{Bucket, CollectingRain, FallingShape, RainSnapshot, ShapeKind};
pub use toy::{create_toy, Playground, PlaygroundSnapshot, Toy, ToySnapshot};
