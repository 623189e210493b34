//! Deterministic Let It Ride execution.
//!
//! A unit is one independently seeded trial: a single-seat [Session] or a
//! multi-seat [TableCoordinator]. Given the same unit seed and configuration,
//! a unit always produces the same results.

pub mod casino;
pub mod factory;
pub mod seed;
pub mod session;
pub mod table;

#[cfg(any(test, feature = "mocks"))]
pub mod mocks;

pub use casino::{Deck, GameError, GameRng};
pub use factory::UnitFactory;
pub use seed::derive_unit_seed;
pub use session::{Session, SessionPhase, Stake};
pub use table::{SeatRound, TableCoordinator, TableRound};
