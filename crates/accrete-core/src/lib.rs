//! Gravity simulation, merge scanning, and configuration for Accrete.
//!
//! This crate owns the two periodic drivers of the simulation and the
//! live-body state they operate on:
//!
//! - [`registry`] -- [`BodyRegistry`], the live set of bodies with atomic
//!   all-or-nothing consumption.
//! - [`gravity`] -- [`GravitySimulator`], the O(n²) pairwise attractor
//!   with a center-bias spring, stepped at a fixed timestep.
//! - [`scanner`] -- [`MergeScanner`], the periodic merge-candidate search
//!   producing at most one [`MergePlan`] per invocation.
//! - [`config`] -- Configuration loading from `accrete-config.yaml` into
//!   strongly-typed structs.
//!
//! [`BodyRegistry`]: registry::BodyRegistry
//! [`GravitySimulator`]: gravity::GravitySimulator
//! [`MergeScanner`]: scanner::MergeScanner
//! [`MergePlan`]: scanner::MergePlan

pub mod config;
pub mod gravity;
pub mod registry;
pub mod scanner;
