// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Transformation driver.
//!
//! Walks a [`Root`] depth-first and drives the [`CompilationUnitBuilder`]:
//! baseline imports, then every global configuration in declaration order,
//! then every listener-triggered flow grouped by the configuration it
//! references.
//!
//! Two correlation maps live for the duration of one run:
//! - listener configuration name -> synthesized service name (first seen wins)
//! - flow name -> resource function handle receiving that flow's statements

pub mod processors;
pub mod templates;

use std::collections::HashMap;

use tracing::debug;

use crate::ast::CompilationUnit;
use crate::builder::{CompilationUnitBuilder, FunctionHandle, util};
use crate::config::CodegenConfig;
use crate::error::{ConversionError, Result};
use crate::naming::{AnonymousNames, NameGenerator, cleanup_path, sanitize_ident, target_ident};
use flowport_dsl::{Flow, GlobalConfiguration, HttpListener, HttpListenerConfig, Processor, Root};
use processors::ProcessorEmitter;

/// Default base path of a listener configuration and resource path of a listener.
pub const DEFAULT_PATH: &str = "/";

/// One conversion run over one [`Root`].
pub struct Transformer<'a> {
    root: &'a Root,
    config: &'a CodegenConfig,
    names: NameGenerator,
    builder: CompilationUnitBuilder,

    listener_config_to_service: HashMap<String, String>,
    flow_to_function: HashMap<String, FunctionHandle>,
    /// Flows currently being emitted; the last one owns the active function
    flow_stack: Vec<String>,
}

impl<'a> Transformer<'a> {
    /// Create a driver with fresh allocators.
    pub fn new(root: &'a Root, config: &'a CodegenConfig) -> Self {
        Self::with_allocators(root, config, NameGenerator::new(), AnonymousNames::new())
    }

    /// Create a driver using the given allocators.
    pub fn with_allocators(
        root: &'a Root,
        config: &'a CodegenConfig,
        names: NameGenerator,
        anonymous_names: AnonymousNames,
    ) -> Self {
        Self {
            root,
            config,
            names,
            builder: CompilationUnitBuilder::with_anonymous_names(&root.name, anonymous_names),
            listener_config_to_service: HashMap::new(),
            flow_to_function: HashMap::new(),
            flow_stack: Vec::new(),
        }
    }

    /// Transform the whole model into a compilation unit.
    ///
    /// Structural problems are detected before anything is emitted, so an
    /// error never leaves a half-built unit behind.
    pub fn run(mut self) -> Result<CompilationUnit> {
        let root = self.root;
        self.validate()?;

        self.builder
            .add_import(templates::EI_ORG_NAME, templates::CONTEXT_MODULE, None, None)?;
        self.builder
            .add_import(templates::EI_ORG_NAME, templates::MULE_MODULE, None, None)?;

        for configuration in &root.global_configurations {
            match configuration {
                GlobalConfiguration::HttpListenerConfig(cfg) => self.visit_listener_config(cfg)?,
                GlobalConfiguration::HttpRequestConfig(cfg) => {
                    debug!(config = %cfg.name, "Skipping unmapped request configuration");
                }
            }
        }

        for group in root.service_map() {
            for flow in group.flows {
                self.visit_flow(flow)?;
            }
        }

        self.builder.build()
    }

    /// Every listener-triggered flow must reference a declared listener
    /// configuration and every listener port must be usable.
    fn validate(&self) -> Result<()> {
        for group in self.root.service_map() {
            match self.root.global_configuration(group.listener_config) {
                Some(GlobalConfiguration::HttpListenerConfig(_)) => {}
                _ => {
                    let flow = group.flows.first().map(|f| f.name.as_str()).unwrap_or("");
                    return Err(ConversionError::MalformedModel(format!(
                        "flow '{}' references unknown listener configuration '{}'",
                        flow, group.listener_config
                    )));
                }
            }
        }
        for configuration in &self.root.global_configurations {
            if let GlobalConfiguration::HttpListenerConfig(cfg) = configuration {
                self.resolve_port(cfg)?;
            }
        }
        Ok(())
    }

    // ========================================================================
    // Global Configurations
    // ========================================================================

    fn resolve_port(&self, cfg: &HttpListenerConfig) -> Result<u16> {
        let port = cfg
            .listener_connection
            .as_ref()
            .and_then(|c| c.port.as_deref());
        match port {
            None => Ok(self.config.default_port),
            Some(text) => text.trim().parse::<u16>().map_err(|_| {
                ConversionError::MalformedModel(format!(
                    "listener configuration '{}' has invalid port '{}'",
                    cfg.name, text
                ))
            }),
        }
    }

    fn visit_listener_config(&mut self, cfg: &HttpListenerConfig) -> Result<()> {
        let connection = cfg.listener_connection.as_ref();
        let host = connection
            .and_then(|c| c.host.as_deref())
            .unwrap_or(self.config.default_host.as_str())
            .to_string();
        let timeout = connection
            .and_then(|c| c.connection_idle_timeout)
            .unwrap_or(self.config.default_idle_timeout_ms);
        let timeout = i64::try_from(timeout).map_err(|_| {
            ConversionError::MalformedModel(format!(
                "listener configuration '{}' has out of range idle timeout {}",
                cfg.name, timeout
            ))
        })?;
        let port = self.resolve_port(cfg)?;
        let base_path = cfg.base_path.as_deref().unwrap_or(DEFAULT_PATH);

        let config_base = sanitize_ident(&cfg.name);
        let config_var = target_ident(&cfg.name);
        self.builder.add_http_service_endpoint_configuration(
            &config_var,
            util::record_literal([
                ("host", util::string_literal(&host)),
                ("timeoutInMillis", util::int_literal(timeout)),
            ]),
        )?;

        let listener_name = self.names.listener_name(&config_base);
        self.builder
            .add_http_listener(&listener_name, port, &config_var)?;

        let service_name = self
            .names
            .service_name(&sanitize_ident(&cleanup_path(base_path)));
        let annotation = util::annotation(
            Some(util::PKG_HTTP),
            util::ANN_NAME_HTTP_SERVICE_CONFIG,
            Some(util::record_literal([(
                util::ANN_CONFIG_ATTR_BASE_PATH,
                util::string_literal(base_path),
            )])),
        );
        self.builder.add_service(
            &service_name,
            vec![util::variable_ref(None, &listener_name)],
            Vec::new(),
            Some(annotation),
        )?;

        debug!(
            config = %cfg.name,
            listener = %listener_name,
            service = %service_name,
            port = port,
            "Synthesized listener and service"
        );

        self.listener_config_to_service
            .entry(cfg.name.clone())
            .or_insert(service_name);
        Ok(())
    }

    // ========================================================================
    // Flows
    // ========================================================================

    fn visit_flow(&mut self, flow: &Flow) -> Result<()> {
        let Some(listener) = flow.listener() else {
            return Ok(());
        };
        debug!(flow = %flow.name, config = %listener.config_ref, "Transforming flow");

        self.flow_stack.push(flow.name.clone());
        self.visit_http_listener(flow, listener)?;

        let function = self.active_function()?;
        self.builder
            .add_statement(&function, templates::context_stmt())?;
        for processor in &flow.processors {
            if matches!(processor, Processor::HttpListener(_)) {
                continue;
            }
            processor.emit(&mut self.builder, &function)?;
        }
        self.builder
            .add_statement(&function, templates::respond_stmt())?;

        self.flow_stack.pop();
        Ok(())
    }

    /// Create the flow's resource function on the service synthesized for
    /// the listener's configuration.
    fn visit_http_listener(&mut self, flow: &Flow, listener: &HttpListener) -> Result<()> {
        let service_name = self
            .listener_config_to_service
            .get(&listener.config_ref)
            .ok_or_else(|| {
                ConversionError::MalformedModel(format!(
                    "flow '{}' references unknown listener configuration '{}'",
                    flow.name, listener.config_ref
                ))
            })?;
        if self.flow_to_function.contains_key(&flow.name) {
            return Err(ConversionError::DuplicateName {
                name: flow.name.clone(),
            });
        }

        let path = listener.path.as_deref().unwrap_or(DEFAULT_PATH);
        let annotation = util::annotation(
            Some(util::PKG_HTTP),
            util::ANN_NAME_RESOURCE_CONFIG,
            Some(util::record_literal([(
                util::ANN_RESOURCE_ATTR_PATH,
                util::string_literal(path),
            )])),
        );
        let function = util::resource_function(&target_ident(&flow.name), Some(annotation));
        let handle = self
            .builder
            .attach_function(service_name.as_str(), function)?;
        self.flow_to_function.insert(flow.name.clone(), handle);
        Ok(())
    }

    fn active_function(&self) -> Result<FunctionHandle> {
        self.flow_stack
            .last()
            .and_then(|flow| self.flow_to_function.get(flow))
            .cloned()
            .ok_or_else(|| ConversionError::MalformedModel("no active flow".to_string()))
    }
}

/// Transform `root` with fresh allocators.
pub fn transform(root: &Root, config: &CodegenConfig) -> Result<CompilationUnit> {
    Transformer::new(root, config).run()
}
