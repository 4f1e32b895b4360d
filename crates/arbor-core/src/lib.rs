//! Arbor Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Arbor renderer
//! and its command-line front end:
//!
//! - **Identifiers**: String-interned node keys ([`identifier::Id`])
//! - **Colors**: CSS color parsing with graphviz output ([`color::Color`])
//! - **Model**: The nested input node structure ([`model`] module)
//! - **Templates**: Per-category label templates ([`template`] module)
//! - **Spec**: The flattened node/edge graph handed to export ([`spec`] module)
//! - **Dataset**: Serializable description of a whole diagram ([`dataset`] module)

pub mod color;
pub mod dataset;
pub mod identifier;
pub mod model;
pub mod spec;
pub mod template;
