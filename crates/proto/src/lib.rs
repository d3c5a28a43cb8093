//! Generated gRPC client/server code for the daemon's control plane.
//!
//! Kept as its own crate so both the `forge-daemon` (server) and
//! `forge-cli` (client) binaries depend on the same generated types
//! without either depending on the other.

#![allow(clippy::all)]

tonic::include_proto!("forge.v1");
