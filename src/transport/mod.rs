// src/transport/mod.rs
//! Local stream socket carrying state lines from analyzer to renderer.

pub mod client;
pub mod framing;
pub mod server;

pub use client::StateSender;
pub use framing::LineAccumulator;
pub use server::StateListener;
