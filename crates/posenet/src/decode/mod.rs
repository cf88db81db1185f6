//! Dense network outputs to poses.
//!
//! All decoders borrow the network's arrays for the duration of one call and
//! keep no state between calls.

mod candidates;
mod multi;
mod refine;
mod scale;
mod single;

pub use candidates::{LOCAL_MAXIMUM_RADIUS, build_part_candidates};
pub use multi::{MultiPoseDecoder, decode_multiple_poses};
pub use refine::refine;
pub use scale::{scale_pose, scale_poses};
pub use single::decode_single_pose;
