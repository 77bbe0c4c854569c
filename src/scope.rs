/// Kind of a name visible during semantic building.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// Lambda-bound parameter, the `o` in `o => ...`
    Parameter,
    /// Caller-supplied name bound to a placeholder operand
    Variable,
}

/// Names visible while resolving field paths.
///
/// The table is append-only: parameters are added as lambdas declare them
/// and are never removed within one top-level build, so a parameter
/// declared inside one collection lambda stays visible to sibling
/// expressions later in the same expression. Lookup is by exact name;
/// duplicate parameter declarations are rejected, not shadowed.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    entries: Vec<(String, Binding)>,
}

impl Scope {
    pub fn new() -> Self {
        Scope::default()
    }

    /// Declare a lambda parameter. Returns false when the name is already
    /// visible, under either binding kind.
    pub fn bind_parameter(&mut self, name: &str) -> bool {
        if self.contains(name) {
            return false;
        }
        self.entries.push((name.to_string(), Binding::Parameter));
        true
    }

    /// Bind a caller-supplied variable name. Re-binding an existing name is
    /// a no-op.
    pub fn bind_variable(&mut self, name: &str) {
        if !self.contains(name) {
            self.entries.push((name.to_string(), Binding::Variable));
        }
    }

    /// Exact-name lookup.
    pub fn lookup(&self, name: &str) -> Option<Binding> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, binding)| *binding)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Pre-populated environment for a compilation.
///
/// Supplies an optional top-level lambda parameter name and any number of
/// externally bound variable names to treat as valid field roots.
///
/// # Examples
///
/// ```
/// use sift_lang::Environment;
///
/// let env = Environment::new()
///     .with_parameter("o")
///     .with_variable("items");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Environment {
    parameter: Option<String>,
    variables: Vec<String>,
}

impl Environment {
    pub fn new() -> Self {
        Environment::default()
    }

    /// Name the implicit top-level lambda parameter.
    pub fn with_parameter(mut self, name: impl Into<String>) -> Self {
        self.parameter = Some(name.into());
        self
    }

    /// Add an externally bound variable name.
    pub fn with_variable(mut self, name: impl Into<String>) -> Self {
        self.variables.push(name.into());
        self
    }

    pub fn parameter(&self) -> Option<&str> {
        self.parameter.as_deref()
    }

    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Seed a fresh scope from this environment.
    pub fn to_scope(&self) -> Scope {
        let mut scope = Scope::new();
        if let Some(name) = &self.parameter {
            scope.bind_parameter(name);
        }
        for name in &self.variables {
            scope.bind_variable(name);
        }
        scope
    }
}
