//! Reusable UI components.

pub mod twin_graph;
