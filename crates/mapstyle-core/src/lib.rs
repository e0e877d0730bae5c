//! Mapstyle Core Types and Definitions
//!
//! This crate provides the foundational types for the mapstyle builders. It includes:
//!
//! - **Colors**: Color handling with CSS and hex color support ([`color::Color`])
//! - **Expressions**: Literal values, property references, functions and filters,
//!   with evaluation against a property map ([`expr`] module)
//! - **Style**: The immutable styled layer descriptor value tree ([`style`] module)
//! - **Factory**: The descriptor factory that constructs value objects and supplies
//!   default values ([`factory`] module)

pub mod color;
pub mod expr;
pub mod factory;
pub mod style;
