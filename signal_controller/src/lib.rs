//! # Signal Controller Library
//!
//! Runs the fixed seven-phase traffic-light sequence on top of
//! [`signal_hal`]. Phases are data ([`phase::SEQUENCE`]) interpreted by one
//! generic [`sequence::SequenceController::run_phase`].
//!
//! # Module Structure
//!
//! - [`phase`] - Lamp sets, phase descriptors, the fixed sequence
//! - [`button`] - Debounced poll-with-timeout on the pedestrian button
//! - [`sequence`] - Controller owning the GPIO block and the clock
//! - [`runner`] - One-shot acquire → run → release entry point

pub mod button;
pub mod phase;
pub mod runner;
pub mod sequence;

pub use crate::button::{WaitOutcome, wait_for_press_or_timeout};
pub use crate::phase::{Lamps, Phase, PhaseExit, SEQUENCE};
pub use crate::runner::{EXIT_SETUP_FAILURE, EXIT_SUCCESS, exit_status, run_once};
pub use crate::sequence::{PhaseRecord, RunReport, SequenceController};
