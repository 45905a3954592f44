//! Panel driver implementations
//!
//! This crate provides concrete implementations of the render device trait
//! defined in tftwire-hal:
//!
//! - ILI9341 240x320 TFT controller over SPI

#![no_std]
#![deny(unsafe_code)]

pub mod ili9341;

pub use ili9341::Ili9341;
