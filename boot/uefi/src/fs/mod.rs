//! Filesystem drivers SuperBoot implements itself, for volumes firmware
//! doesn't already know how to read.

pub mod ext4;
pub mod probe;
