//! Routing module
//!
//! Explicit route table mapping method and path to dispatch targets,
//! replacing any notion of annotation-driven route registration.

mod table;

pub use table::{build_route_table, Route, RouteDecision, RouteTable, RouteTarget};
