//! Shared, allocator-free building blocks used across SuperBoot.
//!
//! This crate has no dependency on UEFI types; it provides the ambient
//! stack every other crate in the workspace builds on: leveled logging,
//! a unified error taxonomy, ASCII/UCS-2 string helpers, and bounded
//! collection aliases backed by [`planck_noalloc`].

#![no_std]

pub mod collections;
pub mod error;
pub mod log;
pub mod str8;

pub use error::Error;
