//! Engine-assigned test identity.

/// The identity the engine attaches to a test: an opaque id plus the
/// full/class/method name triple.
///
/// ## Notes
/// - Ids are assigned at discovery time and reused at execution time; the
///   bridge correlates events by this key, it never generates ids itself.
/// - `fullname` is the unique key within one source assembly and includes
///   literal argument lists for parameterized cases.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NativeTestIdentity {
    pub id: String,
    pub fullname: String,
    pub classname: Option<String>,
    pub methodname: Option<String>,
}

impl NativeTestIdentity {
    pub fn new(id: impl Into<String>, fullname: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fullname: fullname.into(),
            classname: None,
            methodname: None,
        }
    }

    pub fn with_method(
        mut self,
        classname: impl Into<String>,
        methodname: impl Into<String>,
    ) -> Self {
        self.classname = Some(classname.into());
        self.methodname = Some(methodname.into());
        self
    }
}
