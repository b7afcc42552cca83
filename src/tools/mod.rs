//! Tools for Agent Capabilities
//!
//! This module provides the tool infrastructure that lets agents act beyond
//! text generation.
//!
//! # Module Structure
//!
//! - [`registry`](crate::tools::registry) - Tool trait and name-keyed registry
//! - [`deep_research`](crate::tools::deep_research) - `perform_deep_research`,
//!   backed by the research adapter
//!
//! # Tool Registry
//!
//! ```ignore
//! let registry = ToolRegistry::new().with_tool(Arc::new(deep_research_tool));
//! let definitions = registry.get_tool_definitions();  // Schemas offered to the model
//! let result = registry.execute("perform_deep_research", json!({"query": "..."})).await?;
//! ```

/// Deep research tool wrapping the research adapter.
pub mod deep_research;
/// Tool registry for managing available tools.
pub mod registry;

pub use deep_research::{DeepResearchTool, ResearchDefaults, DEEP_RESEARCH_TOOL};
pub use registry::{Tool, ToolRegistry};
