//! Outcome resolution and round orchestration for the ringshot darts game.
//!
//! The [`resolver`] turns random draws or externally supplied outcome codes
//! into concrete landings on the board; the [`round`] actor sequences a
//! round of darts against the rendering shell and an [`source::OutcomeSource`],
//! keeping balance and session statistics consistent under cancellation.

mod events;
pub mod position;
pub mod resolver;
pub mod round;
pub mod segments;
pub mod source;

pub use events::Event;

#[cfg(any(test, feature = "mocks"))]
pub mod mocks;
