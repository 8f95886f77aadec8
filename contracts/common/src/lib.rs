//! Capability gates shared by the staking contracts.
//!
//! This crate provides:
//! - [`ownable`]: the single-owner capability, with transfer and renounce.
//! - [`pausable`]: the global circuit breaker.
//!
//! Both modules report violations as booleans; each contract maps them onto
//! its own error enum.

#![no_std]

pub mod ownable;
pub mod pausable;
