//! The block module is responsible for the fee market concerns of blocks such that it:
//!
//! * Calculates the base fee of a block from its parent.
//! * Verifies the base fee a block header declares.
//! * Projects base fees over a sequence of blocks.

mod gas;
mod projection;
mod verify;


pub use {
    gas::{BaseGasFee, Kip71GasFee, SymmetricGasFee, next_base_fee},
    projection::FeeProjection,
    verify::{BaseFeeError, verify_base_fee, verify_header},
};
