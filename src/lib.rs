//! Balanced binary and multiway search trees for Rust.
//!
//! This crate provides two ordered maps that keep their keys sorted and
//! balanced under any sequence of insertions and removals:
//!
//! - [`RedBlackTree`] - a binary tree balanced by node colors and rotations
//! - [`TwoThreeTree`] - a multiway tree whose leaves all sit at the same depth
//!
//! Both implement the [`SearchTree`] trait, so callers can pick the variant at
//! runtime through [`TreeKind`] and use either one the same way. A tree's
//! current shape can be rendered as indented text for inspection, and the
//! [`command`] module drives a tree from a line-oriented script.
//!
//! # Example
//!
//! ```
//! use search_trees::{SearchTree, TreeKind};
//!
//! let mut tree = "23".parse::<TreeKind>().unwrap().build();
//! for (key, value) in [(5, 'e'), (1, 'a'), (3, 'c')] {
//!     tree.insert(key, value);
//! }
//!
//! assert_eq!(tree.find(&3), Some(&'c'));
//! assert_eq!(tree.minimum(), Some(&'a'));
//! assert_eq!(tree.maximum(), Some(&'e'));
//! assert_eq!(tree.render().to_string(), "└── 3\n    ├── 1\n    └── 5");
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - The library only requires `alloc`
//! - **`tracing`** - Emits debug events on structural changes and warnings for
//!   rejected script lines
//! - **`cli`** (default) - Builds the `search-trees` binary
//!
//! # Implementation
//!
//! Nodes of both trees live in a slab arena and refer to each other by index,
//! parent links included, so no node is ever reference counted or aliased.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

#[macro_use]
mod tracing_helpers;

mod raw;

pub mod command;
pub mod red_black_tree;
pub mod render;
pub mod search_tree;
pub mod two_three_tree;

pub use red_black_tree::RedBlackTree;
pub use render::Rendering;
pub use search_tree::{SearchTree, TreeKind, UnknownTreeKind};
pub use two_three_tree::TwoThreeTree;
