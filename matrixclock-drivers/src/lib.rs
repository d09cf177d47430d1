//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in matrixclock-core for the display hardware:
//!
//! - Ambient light sensor (BH1750 over I2C)
//! - RGB-565 framebuffer with `embedded-graphics` text rendering
//! - HUB75 panel row scanner

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod display;
pub mod sensor;
