use std::fmt;

use panda_types::{quote_name, Type};

use crate::Constant;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum Linkage {
    #[default]
    External,
    /// Not visible outside the module (string literals).
    Private,
}

/// A module-level variable.
///
/// A global without an initializer is an external declaration.
#[derive(Clone, Debug, PartialEq)]
pub struct Global {
    pub name: String,
    /// Type of the stored value; the global itself is a pointer to it.
    pub content: Type,
    pub init: Option<Constant>,
    pub immutable: bool,
    pub linkage: Linkage,
}

impl Global {
    pub fn new(name: impl Into<String>, content: Type, init: Option<Constant>) -> Self {
        Global {
            name: name.into(),
            content,
            init,
            immutable: false,
            linkage: Linkage::External,
        }
    }

    /// Immutable global, printed with `constant`.
    pub fn constant(name: impl Into<String>, init: Constant) -> Self {
        Global {
            name: name.into(),
            content: init.ty(),
            init: Some(init),
            immutable: true,
            linkage: Linkage::External,
        }
    }

    /// Address of the global, of type `content*`.
    pub fn address(&self) -> Constant {
        Constant::Global {
            name: self.name.clone(),
            ty: Type::pointer_to(self.content.clone()),
        }
    }
}

impl fmt::Display for Global {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{} = ", quote_name(&self.name))?;
        if self.linkage == Linkage::Private {
            f.write_str("private ")?;
        }
        let kind = if self.immutable { "constant" } else { "global" };
        match &self.init {
            Some(init) => write!(f, "{kind} {} {init}", self.content),
            None => write!(f, "external {kind} {}", self.content),
        }
    }
}
