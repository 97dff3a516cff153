//! modplan-lib: module dependency graph resolution for build manifests
//!
//! This crate provides the core types of modplan:
//! - `ModuleDescriptor`: one module's declared name, PCH policy and dependencies
//! - `DescriptorStore`: the registered descriptor set for one build
//! - `ModuleGraph`: validated dependency graph with cycle detection
//! - `BuildPlan`: deterministic compilation order with resolved visibility
//!   and PCH sharing groups

pub mod descriptor;
pub mod error;
pub mod graph;
pub mod manifest;
pub mod plan;
pub mod resolve;
pub mod store;
