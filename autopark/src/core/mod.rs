//! Core geometric types shared by every module.

mod point;
mod pose;

pub use point::Point2D;
pub use pose::Pose2D;
