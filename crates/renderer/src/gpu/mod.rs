//! GPU plumbing for the demo.
//!
//! - `context` owns the surface, device, and queue; the surface is fixed at
//!   the demo resolution for the process lifetime.
//! - `compute` holds the resources shared by every compiled program (uniform
//!   buffer, output storage texture, floor texture) and builds
//!   `ComputeProgram`s from validated naga modules.
//! - `blit` presents the output texture onto a full-screen triangle.
//! - `uniforms` mirrors the shader's std140 parameter block on the CPU.

pub(crate) mod blit;
pub(crate) mod compute;
pub(crate) mod context;
pub(crate) mod uniforms;
