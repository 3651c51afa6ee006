#![deny(missing_docs)]

//! Ordered map kept as a sorted singly linked list, [`collections::ListMap`], with node storage obtained through a fallible [`alloc::Allocator`].

//!# Features
//!
//! This crate supports the following cargo features:
//! - `serde` : enables serialisation of [`collections::ListMap`] via serde crate.
//! - `unsafe-optim` : Enable unsafe optimisations in release mode.
//! - `log` : emit diagnostics through the log crate when allocation is refused.

/// Memory allocation.
pub mod alloc;

/// Containers.
pub mod collections;
