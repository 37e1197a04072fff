// SPDX-FileCopyrightText: 2026 Inquest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tool trait, per-call context, and the name-indexed registry.
//!
//! The [`Tool`] trait is the vocabulary the orchestrator draws on for each
//! plan step. The [`ToolRegistry`] resolves step tool names (including legacy
//! aliases) and describes the available tools to the planner.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use inquest_core::{Capabilities, InquestError, Observation, Section, ToolDescriptor};
use inquest_corpus::HybridRetriever;
use serde::de::DeserializeOwned;

use crate::citation_graph::CitationGraphTool;
use crate::hybrid_search::HybridSearchTool;
use crate::timeline::TimelineTool;

/// Everything a tool needs for one invocation.
#[derive(Debug, Clone)]
pub struct ToolContext {
    pub retriever: HybridRetriever,
    /// The step's sub-question; the default query when args omit one.
    pub sub_question: String,
    /// Result limit when args omit `k`.
    pub default_k: usize,
    /// Top paper of the most recent retrieval in this run, for `paper_id: "auto"`.
    pub last_primary_paper: Option<String>,
}

/// A named operation a plan step can invoke.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Returns the tool's unique name (used for lookup and planner descriptions).
    fn name(&self) -> &str;

    /// Returns a human-readable description of what the tool does.
    fn description(&self) -> &str;

    /// Returns the JSON Schema describing the tool's `tool_args`.
    fn parameters_schema(&self) -> serde_json::Value;

    /// Runs the tool. Argument problems are [`InquestError::ToolFailed`].
    async fn invoke(
        &self,
        ctx: &ToolContext,
        args: &serde_json::Value,
    ) -> Result<Observation, InquestError>;
}

/// Registry of available tools, indexed by name.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
    aliases: HashMap<String, String>,
}

impl ToolRegistry {
    /// Creates an empty tool registry.
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            aliases: HashMap::new(),
        }
    }

    /// Registry with `hybrid_search`, `timeline` (alias `timeline_scan`), and `citation_graph`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(HybridSearchTool));
        registry.register(Arc::new(TimelineTool));
        registry.register(Arc::new(CitationGraphTool));
        registry.alias("timeline_scan", "timeline");
        registry
    }

    /// Registers a tool. The tool is indexed by its `name()`.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Makes `alias` resolve to the tool registered as `target`.
    pub fn alias(&mut self, alias: &str, target: &str) {
        self.aliases.insert(alias.to_string(), target.to_string());
    }

    /// Looks up a tool by name or alias.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        let canonical = self.aliases.get(name).map(String::as_str).unwrap_or(name);
        self.tools.get(canonical).cloned()
    }

    /// Resolves and runs a tool, failing with [`InquestError::UnknownTool`] if absent.
    pub async fn invoke(
        &self,
        name: &str,
        ctx: &ToolContext,
        args: &serde_json::Value,
    ) -> Result<Observation, InquestError> {
        let tool = self.get(name).ok_or_else(|| InquestError::UnknownTool {
            name: name.to_string(),
        })?;
        tool.invoke(ctx, args).await
    }

    /// Capability description for the planner, tools sorted by name.
    pub fn describe(&self) -> Capabilities {
        let mut tools: Vec<ToolDescriptor> = self
            .tools
            .values()
            .map(|t| ToolDescriptor {
                name: t.name().to_string(),
                description: t.description().to_string(),
                parameters: t.parameters_schema(),
            })
            .collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        Capabilities {
            tools,
            sections: Section::ALL.to_vec(),
        }
    }

    /// Returns the number of registered tools (aliases excluded).
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Returns true if no tools are registered.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Deserializes tool args, mapping failures to [`InquestError::ToolFailed`].
pub(crate) fn parse_args<T: DeserializeOwned>(tool: &str, args: &serde_json::Value) -> Result<T, InquestError> {
    let args = if args.is_null() {
        serde_json::Value::Object(serde_json::Map::new())
    } else {
        args.clone()
    };
    serde_json::from_value(args)
        .map_err(|e| InquestError::tool_failed(tool, format!("invalid tool_args: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ctx;

    #[test]
    fn builtins_are_registered_and_sorted() {
        let registry = ToolRegistry::with_builtins();
        assert_eq!(registry.len(), 3);
        let caps = registry.describe();
        let names: Vec<&str> = caps.tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["citation_graph", "hybrid_search", "timeline"]);
        assert_eq!(caps.sections.len(), 4);
        assert!(caps.tools.iter().all(|t| t.parameters["type"] == "object"));
    }

    #[test]
    fn alias_resolves_to_timeline() {
        let registry = ToolRegistry::with_builtins();
        assert_eq!(registry.get("timeline_scan").unwrap().name(), "timeline");
    }

    #[tokio::test]
    async fn unknown_tool_is_reported_by_name() {
        let registry = ToolRegistry::with_builtins();
        let err = registry
            .invoke("web_search", &ctx(), &serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, InquestError::UnknownTool { ref name } if name == "web_search"));
        assert!(err.is_step_recoverable());
    }

    #[test]
    fn null_args_parse_as_empty_object() {
        #[derive(serde::Deserialize)]
        struct Args {
            #[serde(default)]
            k: Option<usize>,
        }
        let args: Args = parse_args("t", &serde_json::Value::Null).unwrap();
        assert!(args.k.is_none());
        let err = parse_args::<Args>("t", &serde_json::json!({"k": "many"})).err().unwrap();
        assert!(matches!(err, InquestError::ToolFailed { .. }));
    }
}
