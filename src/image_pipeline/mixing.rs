//! Pseudo-color channel mixing module
//!
//! This module combines images taken under several excitation wavelengths
//! into one RGB composite through two small weight matrices.

mod mixer;
pub mod spec;
pub mod types;

pub use mixer::ChannelMixer;
pub use spec::{parse_weight_entry, MixingConfig, MixingMatrices, MixingSpec};
pub use types::{ExcitationImage, MixOutput};
