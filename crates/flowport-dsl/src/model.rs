// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Model type definitions.
//!
//! These types describe an already-parsed Mule configuration: global
//! configuration blocks, flows, and the processors inside each flow. The
//! converter treats a deserialized [`Root`] as immutable and internally
//! consistent; structural violations are reported by the converter, not here.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Model version - bump when making breaking changes
pub const MODEL_VERSION: &str = "1.0.0";

// ============================================================================
// Root
// ============================================================================

/// Root of a Mule configuration.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Root {
    /// Name of the configuration. Used as the package identity of the output.
    pub name: String,

    /// Global configuration blocks in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub global_configurations: Vec<GlobalConfiguration>,

    /// Flows in arrival order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flows: Vec<Flow>,
}

/// Flows sharing one listener configuration.
#[derive(Debug, Clone)]
pub struct ServiceGroup<'a> {
    /// Name of the listener configuration referenced by every flow in the group
    pub listener_config: &'a str,
    /// Flows in arrival order
    pub flows: Vec<&'a Flow>,
}

impl Root {
    /// Create an empty root with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            global_configurations: Vec::new(),
            flows: Vec::new(),
        }
    }

    /// Look up a global configuration by name.
    pub fn global_configuration(&self, name: &str) -> Option<&GlobalConfiguration> {
        self.global_configurations.iter().find(|c| c.name() == name)
    }

    /// Group listener-triggered flows by the listener configuration they reference.
    ///
    /// Groups follow the declaration order of listener configurations; flows
    /// keep their arrival order inside a group. Flows that reference a
    /// configuration that was never declared are placed in trailing groups,
    /// ordered by first appearance. Flows without a listener are omitted.
    pub fn service_map(&self) -> Vec<ServiceGroup<'_>> {
        let mut groups: Vec<ServiceGroup<'_>> = self
            .global_configurations
            .iter()
            .filter_map(|c| match c {
                GlobalConfiguration::HttpListenerConfig(cfg) => Some(ServiceGroup {
                    listener_config: cfg.name.as_str(),
                    flows: Vec::new(),
                }),
                _ => None,
            })
            .collect();

        for flow in &self.flows {
            let Some(listener) = flow.listener() else {
                continue;
            };
            let config_ref = listener.config_ref.as_str();
            match groups.iter_mut().find(|g| g.listener_config == config_ref) {
                Some(group) => group.flows.push(flow),
                None => groups.push(ServiceGroup {
                    listener_config: config_ref,
                    flows: vec![flow],
                }),
            }
        }

        groups.retain(|g| !g.flows.is_empty());
        groups
    }
}

// ============================================================================
// Global Configurations
// ============================================================================

/// Union of global configuration blocks, discriminated by the `type` field
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type")]
pub enum GlobalConfiguration {
    /// `http:listener-config`
    HttpListenerConfig(HttpListenerConfig),

    /// `http:request-config`
    HttpRequestConfig(HttpRequestConfig),
}

impl GlobalConfiguration {
    /// Name of the configuration block.
    pub fn name(&self) -> &str {
        match self {
            GlobalConfiguration::HttpListenerConfig(c) => &c.name,
            GlobalConfiguration::HttpRequestConfig(c) => &c.name,
        }
    }
}

/// Inbound HTTP endpoint shared by one or more flows.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HttpListenerConfig {
    /// Unique configuration name
    pub name: String,

    /// Base path of every resource served through this configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,

    /// Connection settings; defaults apply when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listener_connection: Option<HttpListenerConnection>,
}

/// `http:listener-connection` nested in a listener configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HttpListenerConnection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// Port as written in the source; may be any text until converted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,

    /// Idle timeout in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_idle_timeout: Option<u64>,
}

/// Outbound HTTP client configuration.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HttpRequestConfig {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,
}

// ============================================================================
// Flows
// ============================================================================

/// A unit of execution: an optional triggering listener followed by processors.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Flow {
    /// Flow name, unique within the configuration
    pub name: String,

    /// Processors in source order. A listener, when present, is the trigger.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub processors: Vec<Processor>,
}

impl Flow {
    /// The listener that triggers this flow, if any.
    pub fn listener(&self) -> Option<&HttpListener> {
        self.processors.iter().find_map(|p| match p {
            Processor::HttpListener(l) => Some(l),
            _ => None,
        })
    }
}

// ============================================================================
// Processors
// ============================================================================

/// Union of processor kinds, discriminated by the `type` field
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, strum::IntoStaticStr)]
#[serde(tag = "type")]
pub enum Processor {
    /// Inbound HTTP endpoint triggering the flow
    HttpListener(HttpListener),

    /// Set the payload of the outbound message
    SetPayload(SetPayload),

    /// Add a header to the outbound message
    SetHeader(SetHeader),

    /// Remove a header from the outbound message
    RemoveHeader(RemoveHeader),

    /// Create or overwrite a flow variable
    SetVariable(SetVariable),

    /// Clear a flow variable
    RemoveVariable(RemoveVariable),

    /// Log a message
    Logger(Logger),

    /// Invoke a sub-flow or private flow
    FlowReference(FlowReference),

    /// Run nested processors asynchronously
    AsyncTask(AsyncTask),

    /// Outbound HTTP call
    HttpRequest(HttpRequest),

    /// Source comment
    Comment(Comment),
}

impl Processor {
    /// Kind name of this processor (the serde tag).
    pub fn kind(&self) -> &'static str {
        self.into()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HttpListener {
    /// Name of the listener configuration this listener is bound to
    pub config_ref: String,

    /// Resource path relative to the configuration's base path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SetPayload {
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SetHeader {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RemoveHeader {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SetVariable {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RemoveVariable {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Logger {
    /// Message to log. Mule logs the whole message when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default)]
    pub level: LogLevel,
}

/// Log level for Logger processors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FlowReference {
    /// Name of the referenced flow
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AsyncTask {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub processors: Vec<Processor>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HttpRequest {
    pub config_ref: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Comment {
    pub text: String,
}
