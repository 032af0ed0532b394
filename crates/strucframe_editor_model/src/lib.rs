// SPDX-License-Identifier: MIT OR Apache-2.0
//! Geometry store for the `StrucFrame` editor.
//!
//! The store owns the structural model:
//! - Nodes (joints) placed in 3D space
//! - Frames (beam elements) joining two distinct nodes
//! - Materials defined for later assignment to frames
//!
//! ## Architecture
//!
//! [`Document`] hands out sequential integer IDs and enforces the frame
//! invariants (no self-loops, no duplicate node pairs). Views never hold
//! references into the store; they receive ordered copies and push changes
//! back through the document API.

pub mod bounds;
pub mod document;
pub mod frame;
pub mod material;
pub mod node;

pub use bounds::Bounds;
pub use document::{Document, FrameError};
pub use frame::{Frame, FrameId};
pub use material::{Material, MaterialError, MaterialId};
pub use node::{Node, NodeId};
