//! Stepwise A* search over pathviz grids.
//!
//! The [`Engine`] runs A* one expansion at a time and reports each action as
//! a [`StepEvent`], so a renderer can animate the search or replay it from a
//! trace:
//!
//! - **Frontier** ordered by f-score with insertion-order tie-breaking
//!   ([`PriorityFrontier`])
//! - **Engine** state machine `Idle → Running → Succeeded | Failed`
//!   ([`Engine::start`], [`Engine::step`], [`Engine::run_to_completion`])
//! - **Traces** binary encoding of event sequences ([`TraceEncoder`],
//!   [`TraceDecoder`])
//!
//! # Trait hierarchy
//!
//! | Trait | Provides |
//! |---|---|
//! | [`Pather`] | bounds, neighbor enumeration |
//! | [`WeightedPather`] : [`Pather`] | edge cost |
//! | [`AstarPather`] : [`WeightedPather`] | admissible estimate |
//!
//! [`Grid`](pathviz_core::Grid) implements all three with orthogonal moves,
//! unit cost and Manhattan distance.

mod distance;
mod engine;
mod error;
mod event;
mod frontier;
mod pather;
mod trace;
mod traits;

pub use distance::manhattan;
pub use engine::{Engine, Membership, SearchNode, SearchState, Steps, UNREACHABLE};
pub use error::SearchError;
pub use event::StepEvent;
pub use frontier::PriorityFrontier;
pub use trace::{TraceDecoder, TraceEncoder, encode_trace};
pub use traits::{AstarPather, Pather, WeightedPather};
