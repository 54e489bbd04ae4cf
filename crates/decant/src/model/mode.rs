/// The phase a model instance is built for.
///
/// A closed enumeration: every call site states its phase explicitly, and
/// there is no string-typed fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelMode {
    Train,
    Eval,
    Infer,
}

impl ModelMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelMode::Train => "train",
            ModelMode::Eval => "eval",
            ModelMode::Infer => "infer",
        }
    }
}

impl std::fmt::Display for ModelMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
