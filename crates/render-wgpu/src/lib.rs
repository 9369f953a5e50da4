//! wgpu render backend for terrain.
//!
//! `WgpuContext` implements `RenderContext` by recording calls and replaying
//! them into one render pass per `submit`. Camera and block uniforms live in
//! dynamic-offset tables so each draw sees the values set before it.
//!
//! # Invariants
//! - The shared unit quad is the only vertex stream; chunk instance buffers
//!   feed locations 2 and 3.
//! - A draw's instance range is passed through as the base instance, never rebased.

mod gpu;
mod plan;
mod shaders;

pub use gpu::{GpuError, RenderTarget, SubmitStats, WgpuContext};
pub use plan::{FrameUniforms, PassPlan, PassStep};
pub use shaders::TERRAIN_SHADER;
