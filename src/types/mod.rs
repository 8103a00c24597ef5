//! Core type definitions using newtype patterns for type safety.
//!
//! These types keep invalid ports and unparsed host strings out of the
//! scan engine.

mod port;
mod target;
mod work_item;

pub use port::{Port, PortError, PortRange, PortSpec};
pub use target::{HostSpec, HostToken, Target, TargetError};
pub use work_item::WorkItem;
