// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Compilation unit builder.
//!
//! The builder is the only writer of the target AST. It keeps three ordered
//! sections (imports, global configurations, services) and emits them in that
//! order on [`CompilationUnitBuilder::build`], so a listener variable is always
//! declared before a service that references it.
//!
//! Lookups by name go through explicit indexes:
//! - imports by `org/module` (adding a known pair is a no-op)
//! - global configurations by variable name ([`ConversionError::DuplicateName`])
//! - services by service name ([`ConversionError::DuplicateService`],
//!   [`ConversionError::UnknownService`])

pub mod util;

use std::collections::HashMap;

use crate::ast::{
    AnnotationAttachment, CompilationUnit, Expression, Flag, FlagSet, Function, GlobalVariable,
    ImportPackage, RecordLiteral, Service, Statement, TopLevelNode, TypeNode,
};
use crate::error::{ConversionError, Result};
use crate::naming::{AnonymousNames, PackageId};

/// Opaque reference to a service registered with a builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceHandle {
    index: usize,
    name: String,
}

impl ServiceHandle {
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Opaque reference to a function attached to a service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionHandle {
    service: ServiceHandle,
    index: usize,
}

impl FunctionHandle {
    pub fn service(&self) -> &ServiceHandle {
        &self.service
    }
}

/// Target of [`CompilationUnitBuilder::attach_function`].
#[derive(Debug, Clone, Copy)]
pub enum ServiceRef<'a> {
    Handle(&'a ServiceHandle),
    Name(&'a str),
}

impl<'a> From<&'a ServiceHandle> for ServiceRef<'a> {
    fn from(handle: &'a ServiceHandle) -> Self {
        ServiceRef::Handle(handle)
    }
}

impl<'a> From<&'a str> for ServiceRef<'a> {
    fn from(name: &'a str) -> Self {
        ServiceRef::Name(name)
    }
}

impl<'a> From<&'a String> for ServiceRef<'a> {
    fn from(name: &'a String) -> Self {
        ServiceRef::Name(name.as_str())
    }
}

/// Append-only builder for one compilation unit.
#[derive(Debug)]
pub struct CompilationUnitBuilder {
    name: String,
    package_id: PackageId,
    anonymous_names: AnonymousNames,

    imports: Vec<ImportPackage>,
    global_configurations: Vec<GlobalVariable>,
    services: Vec<Service>,

    /// `org/module` -> index into `imports`
    import_index: HashMap<String, usize>,
    /// variable name -> index into `global_configurations`
    global_index: HashMap<String, usize>,
    /// service name -> index into `services`
    service_index: HashMap<String, usize>,

    built: bool,
}

impl CompilationUnitBuilder {
    /// Create a builder whose package identity is the unit name.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_anonymous_names(name, AnonymousNames::new())
    }

    /// Create a builder that allocates service type keys from `anonymous_names`.
    pub fn with_anonymous_names(name: impl Into<String>, anonymous_names: AnonymousNames) -> Self {
        let name = name.into();
        Self {
            package_id: PackageId::new(name.clone()),
            name,
            anonymous_names,
            imports: Vec::new(),
            global_configurations: Vec::new(),
            services: Vec::new(),
            import_index: HashMap::new(),
            global_index: HashMap::new(),
            service_index: HashMap::new(),
            built: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn ensure_open(&self) -> Result<()> {
        if self.built {
            return Err(ConversionError::AlreadyBuilt {
                unit: self.name.clone(),
            });
        }
        Ok(())
    }

    // ========================================================================
    // Imports
    // ========================================================================

    /// Add an import. Adding an `(org, module)` pair that is already present
    /// returns the existing node unchanged.
    pub fn add_import(
        &mut self,
        org_name: &str,
        module_name: &str,
        version: Option<&str>,
        alias: Option<&str>,
    ) -> Result<&ImportPackage> {
        self.ensure_open()?;
        let key = format!("{}/{}", org_name, module_name);
        let index = match self.import_index.get(&key) {
            Some(&index) => index,
            None => {
                self.imports
                    .push(util::import_package(org_name, module_name, version, alias));
                let index = self.imports.len() - 1;
                self.import_index.insert(key, index);
                index
            }
        };
        Ok(&self.imports[index])
    }

    // ========================================================================
    // Global Configurations
    // ========================================================================

    fn register_global(&mut self, variable: GlobalVariable) -> Result<&GlobalVariable> {
        self.ensure_open()?;
        let name = variable.name.value().to_string();
        if self.global_index.contains_key(&name) {
            return Err(ConversionError::DuplicateName { name });
        }
        self.global_configurations.push(variable);
        let index = self.global_configurations.len() - 1;
        self.global_index.insert(name, index);
        Ok(&self.global_configurations[index])
    }

    /// Append a typed global variable.
    pub fn add_global_config(
        &mut self,
        type_node: TypeNode,
        name: &str,
        initializer: Expression,
    ) -> Result<&GlobalVariable> {
        self.register_global(util::global_variable(
            Some(type_node),
            name,
            initializer,
            FlagSet::new(),
        ))
    }

    /// Append a global variable flagged as a listener.
    pub fn add_listener(
        &mut self,
        type_node: TypeNode,
        name: &str,
        initializer: Expression,
    ) -> Result<&GlobalVariable> {
        self.register_global(util::global_variable(
            Some(type_node),
            name,
            initializer,
            FlagSet::from([Flag::Listener]),
        ))
    }

    /// Add an `http:ServiceEndpointConfiguration` variable named `name`.
    pub fn add_http_service_endpoint_configuration(
        &mut self,
        name: &str,
        configuration: RecordLiteral,
    ) -> Result<&GlobalVariable> {
        self.add_import(util::ORG_BALLERINA, util::PKG_HTTP, None, None)?;
        self.add_global_config(
            util::user_defined_type(
                Some(util::PKG_HTTP),
                util::HTTP_SERVICE_ENDPOINT_CONFIGURATION,
            ),
            name,
            Expression::RecordLiteral(configuration),
        )
    }

    /// Add `listener http:Listener <listener_name> = new(<port>, config = <config_name>);`
    pub fn add_http_listener(
        &mut self,
        listener_name: &str,
        port: u16,
        config_name: &str,
    ) -> Result<&GlobalVariable> {
        self.add_import(util::ORG_BALLERINA, util::PKG_HTTP, None, None)?;
        let init = util::type_init(vec![
            util::int_literal(i64::from(port)),
            util::named_arg("config", util::variable_ref(None, config_name)),
        ]);
        self.add_listener(
            util::user_defined_type(Some(util::PKG_HTTP), util::HTTP_LISTENER),
            listener_name,
            init,
        )
    }

    /// Look up a global configuration by variable name.
    pub fn global_configuration(&self, name: &str) -> Option<&GlobalVariable> {
        self.global_index
            .get(name)
            .map(|&index| &self.global_configurations[index])
    }

    // ========================================================================
    // Services
    // ========================================================================

    /// Register a service attached to `attached_exprs`.
    ///
    /// `functions` is the initial body of the service type; further functions
    /// are added with [`attach_function`](Self::attach_function).
    pub fn add_service(
        &mut self,
        name: &str,
        attached_exprs: Vec<Expression>,
        functions: Vec<Function>,
        annotation: Option<AnnotationAttachment>,
    ) -> Result<ServiceHandle> {
        self.ensure_open()?;
        if self.service_index.contains_key(name) {
            return Err(ConversionError::DuplicateService {
                name: name.to_string(),
            });
        }
        let type_name = self
            .anonymous_names
            .next_service_type_key(&self.package_id, name);
        self.services.push(util::service(
            name,
            attached_exprs,
            &type_name,
            annotation,
            functions,
        ));
        let index = self.services.len() - 1;
        self.service_index.insert(name.to_string(), index);
        Ok(ServiceHandle {
            index,
            name: name.to_string(),
        })
    }

    fn resolve_service(&self, target: ServiceRef<'_>) -> Result<usize> {
        let found = match target {
            ServiceRef::Handle(handle) => self
                .services
                .get(handle.index)
                .filter(|s| s.name.value() == handle.name)
                .map(|_| handle.index),
            ServiceRef::Name(name) => self.service_index.get(name).copied(),
        };
        found.ok_or_else(|| ConversionError::UnknownService {
            name: match target {
                ServiceRef::Handle(handle) => handle.name.clone(),
                ServiceRef::Name(name) => name.to_string(),
            },
        })
    }

    /// Append `function` to a registered service. Function names are unique
    /// within a service ([`ConversionError::DuplicateName`]).
    pub fn attach_function<'a>(
        &mut self,
        target: impl Into<ServiceRef<'a>>,
        function: Function,
    ) -> Result<FunctionHandle> {
        self.ensure_open()?;
        let service_index = self.resolve_service(target.into())?;
        let service = &mut self.services[service_index];
        if service
            .type_definition
            .functions()
            .iter()
            .any(|f| f.name == function.name)
        {
            return Err(ConversionError::DuplicateName {
                name: function.name.value().to_string(),
            });
        }
        let index = service.type_definition.attach(function);
        Ok(FunctionHandle {
            service: ServiceHandle {
                index: service_index,
                name: service.name.value().to_string(),
            },
            index,
        })
    }

    /// Append a statement to the body of an attached function.
    pub fn add_statement(&mut self, function: &FunctionHandle, statement: Statement) -> Result<()> {
        self.ensure_open()?;
        let service_index = self.resolve_service(ServiceRef::Handle(&function.service))?;
        let target = self.services[service_index]
            .type_definition
            .function_mut(function.index)
            .ok_or_else(|| ConversionError::UnknownService {
                name: function.service.name.clone(),
            })?;
        target.body.statements.push(statement);
        Ok(())
    }

    /// Look up a registered service by name.
    pub fn service(&self, name: &str) -> Option<&Service> {
        self.service_index
            .get(name)
            .map(|&index| &self.services[index])
    }

    pub fn service_count(&self) -> usize {
        self.services.len()
    }

    // ========================================================================
    // Build
    // ========================================================================

    /// Finalize the compilation unit. Callable once; later calls and any
    /// further mutation fail with [`ConversionError::AlreadyBuilt`].
    pub fn build(&mut self) -> Result<CompilationUnit> {
        self.ensure_open()?;
        self.built = true;

        let mut top_level_nodes = Vec::with_capacity(
            self.imports.len() + self.global_configurations.len() + self.services.len(),
        );
        top_level_nodes.extend(
            std::mem::take(&mut self.imports)
                .into_iter()
                .map(TopLevelNode::Import),
        );
        top_level_nodes.extend(
            std::mem::take(&mut self.global_configurations)
                .into_iter()
                .map(TopLevelNode::GlobalVariable),
        );
        top_level_nodes.extend(
            std::mem::take(&mut self.services)
                .into_iter()
                .map(TopLevelNode::Service),
        );
        self.import_index.clear();
        self.global_index.clear();
        self.service_index.clear();

        Ok(CompilationUnit {
            name: self.name.clone(),
            top_level_nodes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Identifier;

    fn listener_ref() -> Vec<Expression> {
        vec![util::variable_ref(None, "_LISTENER_cfg0")]
    }

    #[test]
    fn test_import_dedup() {
        let mut builder = CompilationUnitBuilder::new("hello");
        for _ in 0..5 {
            builder.add_import("ei", "Mule", None, None).unwrap();
        }
        builder.add_import("ei", "Context", None, None).unwrap();
        let unit = builder.build().unwrap();
        assert_eq!(unit.imports().count(), 2);
    }

    #[test]
    fn test_import_dedup_keeps_first_node() {
        let mut builder = CompilationUnitBuilder::new("hello");
        builder.add_import("ei", "Mule", None, Some("m")).unwrap();
        let again = builder.add_import("ei", "Mule", None, Some("other")).unwrap();
        assert_eq!(again.alias.value(), "m");
    }

    #[test]
    fn test_duplicate_global_name_fails() {
        let mut builder = CompilationUnitBuilder::new("hello");
        builder
            .add_http_service_endpoint_configuration("cfg", RecordLiteral::default())
            .unwrap();
        let err = builder
            .add_http_service_endpoint_configuration("cfg", RecordLiteral::default())
            .unwrap_err();
        assert_eq!(
            err,
            ConversionError::DuplicateName {
                name: "cfg".to_string()
            }
        );
    }

    #[test]
    fn test_http_listener_is_flagged_and_imports_http() {
        let mut builder = CompilationUnitBuilder::new("hello");
        let listener = builder.add_http_listener("_LISTENER_cfg0", 9091, "cfg").unwrap();
        assert!(listener.flags.contains(&Flag::Listener));
        assert!(builder.global_configuration("_LISTENER_cfg0").is_some());

        let unit = builder.build().unwrap();
        let imports: Vec<String> = unit
            .imports()
            .map(|i| format!("{}/{}", i.org_name, i.module_name()))
            .collect();
        assert_eq!(imports, vec!["ballerina/http"]);
    }

    #[test]
    fn test_duplicate_service_fails() {
        let mut builder = CompilationUnitBuilder::new("hello");
        builder
            .add_service("svc", listener_ref(), Vec::new(), None)
            .unwrap();
        let err = builder
            .add_service("svc", listener_ref(), Vec::new(), None)
            .unwrap_err();
        assert!(matches!(err, ConversionError::DuplicateService { name } if name == "svc"));
    }

    #[test]
    fn test_service_type_keys_are_sequential_per_unit() {
        let mut builder = CompilationUnitBuilder::new("hello");
        builder.add_service("a", listener_ref(), Vec::new(), None).unwrap();
        builder.add_service("b", listener_ref(), Vec::new(), None).unwrap();
        assert_eq!(
            builder.service("a").unwrap().type_definition.name.value(),
            "a$$service$0"
        );
        assert_eq!(
            builder.service("b").unwrap().type_definition.name.value(),
            "b$$service$1"
        );
    }

    #[test]
    fn test_attach_function_by_handle_and_name() {
        let mut builder = CompilationUnitBuilder::new("hello");
        let handle = builder
            .add_service("svc", listener_ref(), Vec::new(), None)
            .unwrap();
        builder
            .attach_function(&handle, util::resource_function("first", None))
            .unwrap();
        builder
            .attach_function("svc", util::resource_function("second", None))
            .unwrap();

        let names: Vec<&str> = builder
            .service("svc")
            .unwrap()
            .type_definition
            .functions()
            .iter()
            .map(|f| f.name.value())
            .collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn test_attach_function_rejects_duplicate_name() {
        let mut builder = CompilationUnitBuilder::new("hello");
        builder.add_service("svc", listener_ref(), Vec::new(), None).unwrap();
        builder
            .attach_function("svc", util::resource_function("get_order", None))
            .unwrap();
        let err = builder
            .attach_function("svc", util::resource_function("get_order", None))
            .unwrap_err();
        assert_eq!(
            err,
            ConversionError::DuplicateName {
                name: "get_order".to_string()
            }
        );
        assert_eq!(builder.service("svc").unwrap().type_definition.functions().len(), 1);

        // Same name on another service is fine
        builder.add_service("other", listener_ref(), Vec::new(), None).unwrap();
        builder
            .attach_function("other", util::resource_function("get_order", None))
            .unwrap();
    }

    #[test]
    fn test_service_variable_is_typed_by_its_type_definition() {
        let mut builder = CompilationUnitBuilder::new("hello");
        builder.add_service("svc", listener_ref(), Vec::new(), None).unwrap();
        let unit = builder.build().unwrap();

        let service = unit.services().next().unwrap();
        assert_eq!(service.variable.name, service.name);
        assert_eq!(
            service.variable.flags,
            FlagSet::from([Flag::Final, Flag::Service])
        );
        assert_eq!(
            service.variable.type_node,
            Some(util::user_defined_type(None, "svc$$service$0"))
        );
        assert!(service.type_definition.flags.contains(&Flag::Service));
    }

    #[test]
    fn test_attach_function_to_unknown_service_fails() {
        let mut builder = CompilationUnitBuilder::new("hello");
        let err = builder
            .attach_function("missing", util::resource_function("f", None))
            .unwrap_err();
        assert_eq!(
            err,
            ConversionError::UnknownService {
                name: "missing".to_string()
            }
        );
    }

    #[test]
    fn test_add_statement_targets_function_body() {
        let mut builder = CompilationUnitBuilder::new("hello");
        builder.add_service("svc", listener_ref(), Vec::new(), None).unwrap();
        let first = builder
            .attach_function("svc", util::resource_function("first", None))
            .unwrap();
        let second = builder
            .attach_function("svc", util::resource_function("second", None))
            .unwrap();

        builder
            .add_statement(&second, util::variable_def("x", util::int_literal(1)))
            .unwrap();
        builder
            .add_statement(&first, util::variable_def("y", util::int_literal(2)))
            .unwrap();
        builder
            .add_statement(&second, util::variable_def("z", util::int_literal(3)))
            .unwrap();

        let service = builder.service("svc").unwrap();
        let functions = service.type_definition.functions();
        assert_eq!(functions[0].body.statements.len(), 1);
        assert_eq!(functions[1].body.statements.len(), 2);
        assert_eq!(first.service().name(), "svc");
    }

    #[test]
    fn test_build_orders_sections() {
        let mut builder = CompilationUnitBuilder::new("hello");
        // Appended out of section order on purpose
        builder.add_service("svc", listener_ref(), Vec::new(), None).unwrap();
        builder.add_http_listener("_LISTENER_cfg0", 8081, "cfg").unwrap();
        builder.add_import("ei", "Mule", None, None).unwrap();

        let unit = builder.build().unwrap();
        let kinds: Vec<&str> = unit
            .top_level_nodes
            .iter()
            .map(|n| match n {
                TopLevelNode::Import(_) => "import",
                TopLevelNode::GlobalVariable(_) => "global",
                TopLevelNode::Service(_) => "service",
            })
            .collect();
        assert_eq!(kinds, vec!["import", "import", "global", "service"]);
    }

    #[test]
    fn test_build_twice_fails_and_first_tree_survives() {
        let mut builder = CompilationUnitBuilder::new("hello");
        builder.add_import("ei", "Mule", None, None).unwrap();
        let unit = builder.build().unwrap();

        let err = builder.build().unwrap_err();
        assert_eq!(
            err,
            ConversionError::AlreadyBuilt {
                unit: "hello".to_string()
            }
        );
        assert_eq!(unit.name, "hello");
        assert_eq!(unit.imports().count(), 1);
        assert_eq!(
            unit.imports().next().unwrap().alias,
            Identifier::new("Mule")
        );
    }

    #[test]
    fn test_mutation_after_build_fails() {
        let mut builder = CompilationUnitBuilder::new("hello");
        builder.build().unwrap();
        assert!(matches!(
            builder.add_import("ei", "Mule", None, None),
            Err(ConversionError::AlreadyBuilt { .. })
        ));
        assert!(matches!(
            builder.add_service("svc", Vec::new(), Vec::new(), None),
            Err(ConversionError::AlreadyBuilt { .. })
        ));
    }
}
