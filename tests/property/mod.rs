//! Property-based tests for filtering and the line protocol

mod prefix_filter;
mod protocol;
