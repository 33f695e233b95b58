//! Kernel loaders: everything that runs after a [`BootTarget`](crate::entry::BootTarget)
//! has been chosen and before control leaves this image for good.

pub mod chainload;
pub mod e820;
pub mod linux;
