//! Background jobs

mod image_sweeper;

pub use image_sweeper::{spawn_sweeper, sweep_unused_images, SweepReport};
