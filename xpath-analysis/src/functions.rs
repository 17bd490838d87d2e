//! The XPath 1.0 core function library
//!
//! Typed signatures for the node-set, string, boolean and number function
//! groups. This is the default [`FunctionContext`] used by the inspections'
//! tests; hosts extend or replace it with their own library (XSLT adds
//! `key()`, `document()` and friends on top of this set).

use crate::context::{Function, FunctionContext, Parameter};
use std::collections::HashMap;
use xpath_ast::QName;
use xpath_types::XPathType;

/// Function context exposing the XPath 1.0 core library.
#[derive(Debug, Clone)]
pub struct CoreFunctionContext {
    functions: HashMap<String, Function>,
}

impl CoreFunctionContext {
    /// Build the core library.
    pub fn new() -> Self {
        let mut functions = HashMap::new();
        for function in core_functions() {
            functions.insert(function.name.local.clone(), function);
        }
        Self { functions }
    }
}

impl Default for CoreFunctionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl FunctionContext for CoreFunctionContext {
    fn resolve(&self, name: &QName, arity: usize) -> Option<&Function> {
        if name.prefix.is_some() {
            return None;
        }
        self.functions
            .get(&name.local)
            .filter(|f| f.accepts_arity(arity))
    }

    fn functions(&self) -> Vec<&Function> {
        let mut all: Vec<&Function> = self.functions.values().collect();
        all.sort_by(|a, b| a.name.local.cmp(&b.name.local));
        all
    }
}

fn function(
    name: &str,
    parameters: Vec<Parameter>,
    return_type: XPathType,
) -> Function {
    Function::new(QName::local(name), parameters, return_type)
}

fn core_functions() -> Vec<Function> {
    use Parameter as P;
    use XPathType::{Any, Boolean, NodeSet, Number, String};

    vec![
        // node-set group
        function("last", vec![], Number),
        function("position", vec![], Number),
        function("count", vec![P::required(NodeSet)], Number),
        function("id", vec![P::required(Any)], NodeSet),
        function("local-name", vec![P::optional(NodeSet)], String),
        function("namespace-uri", vec![P::optional(NodeSet)], String),
        function("name", vec![P::optional(NodeSet)], String),
        // string group
        function("string", vec![P::optional(Any)], String),
        function(
            "concat",
            vec![
                P::required(String),
                P::required(String),
                P::variadic(String),
            ],
            String,
        ),
        function(
            "starts-with",
            vec![P::required(String), P::required(String)],
            Boolean,
        ),
        function(
            "contains",
            vec![P::required(String), P::required(String)],
            Boolean,
        ),
        function(
            "substring-before",
            vec![P::required(String), P::required(String)],
            String,
        ),
        function(
            "substring-after",
            vec![P::required(String), P::required(String)],
            String,
        ),
        function(
            "substring",
            vec![
                P::required(String),
                P::required(Number),
                P::optional(Number),
            ],
            String,
        ),
        function("string-length", vec![P::optional(String)], Number),
        function("normalize-space", vec![P::optional(String)], String),
        function(
            "translate",
            vec![
                P::required(String),
                P::required(String),
                P::required(String),
            ],
            String,
        ),
        // boolean group
        function("boolean", vec![P::required(Any)], Boolean),
        function("not", vec![P::required(Boolean)], Boolean),
        function("true", vec![], Boolean),
        function("false", vec![], Boolean),
        function("lang", vec![P::required(String)], Boolean),
        // number group
        function("number", vec![P::optional(Any)], Number),
        function("sum", vec![P::required(NodeSet)], Number),
        function("floor", vec![P::required(Number)], Number),
        function("ceiling", vec![P::required(Number)], Number),
        function("round", vec![P::required(Number)], Number),
    ]
}
