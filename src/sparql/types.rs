use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One bound value in a result row / 结果行中的一个绑定值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Binding {
    /// "uri", "literal" or "bnode" / 绑定类型
    #[serde(rename = "type", default)]
    pub kind: String,
    pub value: String,
}

impl Binding {
    pub fn literal(value: impl Into<String>) -> Self {
        Self {
            kind: "literal".to_string(),
            value: value.into(),
        }
    }

    pub fn uri(value: impl Into<String>) -> Self {
        Self {
            kind: "uri".to_string(),
            value: value.into(),
        }
    }
}

/// Result row: variable name -> binding / 结果行：变量名 -> 绑定
///
/// Unbound variables are simply absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRow(HashMap<String, Binding>);

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder helper, binds a literal / 绑定字面量
    pub fn with(mut self, var: &str, value: &str) -> Self {
        self.0.insert(var.to_string(), Binding::literal(value));
        self
    }

    /// Builder helper, binds a URI / 绑定URI
    pub fn with_uri(mut self, var: &str, value: &str) -> Self {
        self.0.insert(var.to_string(), Binding::uri(value));
        self
    }

    pub fn binding(&self, var: &str) -> Option<&Binding> {
        self.0.get(var)
    }

    /// Value of a variable, None when unbound / 变量值，未绑定时为None
    pub fn get(&self, var: &str) -> Option<&str> {
        self.0.get(var).map(|b| b.value.as_str())
    }
}

/// SPARQL 1.1 JSON results document / SPARQL JSON结果文档
#[derive(Debug, Clone, Deserialize)]
pub struct SparqlResponse {
    pub results: SparqlResults,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SparqlResults {
    #[serde(default)]
    pub bindings: Vec<RawRow>,
}
