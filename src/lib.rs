//! Red-black score multiset and leaderboard for Rust.
//!
//! This crate provides [`RBTree`], an ordered multiset of `i64` keys kept
//! balanced by red-black rebalancing, and [`Leaderboard`], which maps player
//! names to scores and answers rank queries from the tree.
//!
//! - Insert, remove, membership and rank queries in O(log n)
//! - Duplicate keys are independent members of the multiset
//! - [`validate`](RBTree::validate) checks the red-black invariants without
//!   modifying the tree, and is cheap enough to call after every mutation
//!
//! # Example
//!
//! ```
//! use rbt_leaderboard::{Leaderboard, RBTree};
//!
//! let mut tree = RBTree::new();
//! for key in [120, 80, 150, 80, 140] {
//!     tree.insert(key);
//! }
//! assert_eq!(tree.to_vec(), [80, 80, 120, 140, 150]);
//! assert!(tree.validate());
//!
//! let mut board = Leaderboard::new();
//! board.add_or_update("alice", 120);
//! board.add_or_update("carl", 150);
//! assert_eq!(board.rank_of("alice").map(|info| info.rank), Some(2));
//! ```
//!
//! # Implementation
//!
//! Nodes live in an arena and refer to their parent and children by index,
//! so rotations and splices are index rewrites. Absent children count as
//! black leaves; there is no shared sentinel node.

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

mod raw;

pub mod leaderboard;
pub mod rbtree;

pub use leaderboard::{Leaderboard, Player, RankInfo};
pub use rbtree::RBTree;
