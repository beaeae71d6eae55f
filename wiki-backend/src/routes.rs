//! Route table — maps a request path to a wiki operation and page title.
//!
//! Patterns are compiled once at startup and the table is shared read-only
//! with every handler.

use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Home,
    View,
    Edit,
    Save,
}

/// Ordered (operation, pattern) pairs; the first match wins
const ROUTES: &[(Operation, &str)] = &[
    (Operation::Home, r"^/$"),
    (Operation::View, r"^/view/([a-zA-Z0-9]+)$"),
    (Operation::Edit, r"^/edit/([a-zA-Z0-9]+)$"),
    (Operation::Save, r"^/save/([a-zA-Z0-9]+)$"),
];

/// A resolved route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub operation: Operation,
    /// Empty for `Home`
    pub title: String,
}

pub struct RouteTable {
    routes: Vec<(Operation, Regex)>,
}

impl RouteTable {
    pub fn new() -> Result<Self, regex::Error> {
        let routes = ROUTES
            .iter()
            .map(|(op, pattern)| Regex::new(pattern).map(|re| (*op, re)))
            .collect::<Result<Vec<_>, regex::Error>>()?;
        Ok(Self { routes })
    }

    /// Find the operation for a path and pull out its title
    pub fn resolve(&self, path: &str) -> Option<RouteMatch> {
        self.routes.iter().find_map(|(operation, re)| {
            let caps = re.captures(path)?;
            let title = caps
                .get(1)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();
            Some(RouteMatch {
                operation: *operation,
                title,
            })
        })
    }
}
