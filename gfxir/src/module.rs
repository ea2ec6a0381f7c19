//! Minimal IR container.
//!
//! A [`Module`] owns functions, global variables and named struct types.
//! Every entity is addressed by a UUID-backed handle that is never reused:
//! removing an entity retires its handle and cloning one produces a fresh
//! handle. Anything keyed by a handle (compiler metadata in particular) can
//! therefore never silently alias a different entity, and handles minted by
//! another module never resolve here.
use indexmap::IndexMap;
use log::trace;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{metadata::NamedMetadata, utils::Error};

macro_rules! define_handle {
    (
        $(#[$doc:meta])*
        $handle:ident, $prefix:literal
    ) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        pub struct $handle(Uuid);

        impl $handle {
            /// A handle that never resolves in any module.
            pub const NIL: Self = Self(Uuid::nil());

            /// Mint a fresh, never before seen handle.
            pub fn new_unique() -> Self {
                Self(Uuid::new_v4())
            }

            /// Rebuild a handle from its UUID. The result only resolves if an
            /// entity with that UUID is still alive in the module.
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $handle {
            fn default() -> Self {
                Self::NIL
            }
        }

        impl std::fmt::Display for $handle {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

define_handle!(
    /// Stable reference to a [`Function`] of a [`Module`].
    FunctionRef, "@fn."
);
define_handle!(
    /// Stable reference to a [`GlobalVariable`] of a [`Module`].
    GlobalRef, "@gv."
);
define_handle!(
    /// Stable reference to a named [`StructType`] of a [`Module`].
    StructTypeRef, "%struct."
);

/// A function of the module.
///
/// Only what the metadata layer needs is modelled: a name and the function's
/// own metadata attachments.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub metadata: NamedMetadata,
}

/// A module-scope variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GlobalVariable {
    pub name: String,
    pub address_space: u32,
    pub size_in_bytes: u64,
}

/// A named structure type. Fields are kept as textual type descriptions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StructType {
    pub name: String,
    pub fields: Vec<String>,
}

/// A compilation unit.
///
/// `Module` does not implement `Clone`: handles belong to exactly one module
/// instance.
#[derive(Debug)]
pub struct Module {
    uuid: Uuid,
    pub name: String,
    functions: IndexMap<FunctionRef, Function>,
    globals: IndexMap<GlobalRef, GlobalVariable>,
    struct_types: IndexMap<StructTypeRef, StructType>,
    /// Module-level metadata roots.
    pub metadata: NamedMetadata,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.into(),
            functions: IndexMap::new(),
            globals: IndexMap::new(),
            struct_types: IndexMap::new(),
            metadata: NamedMetadata::new(),
        }
    }

    /// Unique identifier of this module instance.
    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    /// Define a new function at the end of the module.
    pub fn add_function(&mut self, name: impl Into<String>) -> Result<FunctionRef, Error> {
        let name = name.into();
        if self.function_by_name(&name).is_some() {
            return Err(Error::FunctionNameAlreadyExists(name));
        }

        let handle = FunctionRef::new_unique();
        self.functions.insert(
            handle,
            Function {
                name,
                metadata: NamedMetadata::new(),
            },
        );
        Ok(handle)
    }

    /// Remove a function, preserving the relative order of the others.
    pub fn remove_function(&mut self, function: FunctionRef) -> Option<Function> {
        let removed = self.functions.shift_remove(&function);
        if removed.is_some() {
            trace!("removed function {function} from module `{}`", self.name);
        }
        removed
    }

    /// Clone a function under a new name. The clone receives a fresh handle
    /// and a copy of the original's metadata attachments.
    pub fn clone_function(
        &mut self,
        function: FunctionRef,
        new_name: impl Into<String>,
    ) -> Result<FunctionRef, Error> {
        let new_name = new_name.into();
        if self.function_by_name(&new_name).is_some() {
            return Err(Error::FunctionNameAlreadyExists(new_name));
        }

        let mut clone = self
            .functions
            .get(&function)
            .cloned()
            .ok_or(Error::UndefinedFunction { function })?;
        clone.name = new_name;

        let handle = FunctionRef::new_unique();
        self.functions.insert(handle, clone);
        Ok(handle)
    }

    pub fn rename_function(
        &mut self,
        function: FunctionRef,
        new_name: impl Into<String>,
    ) -> Result<(), Error> {
        let new_name = new_name.into();
        if let Some(existing) = self.function_by_name(&new_name) {
            if existing == function {
                return Ok(());
            }
            return Err(Error::FunctionNameAlreadyExists(new_name));
        }

        let target = self
            .functions
            .get_mut(&function)
            .ok_or(Error::UndefinedFunction { function })?;
        target.name = new_name;
        Ok(())
    }

    /// Move a function to position `index` in the module's function order.
    pub fn move_function(&mut self, function: FunctionRef, index: usize) -> Result<(), Error> {
        let from = self
            .functions
            .get_index_of(&function)
            .ok_or(Error::UndefinedFunction { function })?;
        let to = index.min(self.functions.len() - 1);
        self.functions.move_index(from, to);
        Ok(())
    }

    pub fn function(&self, function: FunctionRef) -> Option<&Function> {
        self.functions.get(&function)
    }

    pub fn function_mut(&mut self, function: FunctionRef) -> Option<&mut Function> {
        self.functions.get_mut(&function)
    }

    pub fn contains_function(&self, function: FunctionRef) -> bool {
        self.functions.contains_key(&function)
    }

    pub fn function_by_name(&self, name: &str) -> Option<FunctionRef> {
        self.functions
            .iter()
            .find(|(_, function)| function.name == name)
            .map(|(handle, _)| *handle)
    }

    /// Functions in module order.
    pub fn functions(&self) -> impl Iterator<Item = (FunctionRef, &Function)> {
        self.functions.iter().map(|(handle, function)| (*handle, function))
    }

    pub fn functions_mut(&mut self) -> impl Iterator<Item = (FunctionRef, &mut Function)> {
        self.functions
            .iter_mut()
            .map(|(handle, function)| (*handle, function))
    }

    pub fn add_global(&mut self, global: GlobalVariable) -> GlobalRef {
        let handle = GlobalRef::new_unique();
        self.globals.insert(handle, global);
        handle
    }

    pub fn remove_global(&mut self, global: GlobalRef) -> Option<GlobalVariable> {
        self.globals.shift_remove(&global)
    }

    pub fn global(&self, global: GlobalRef) -> Option<&GlobalVariable> {
        self.globals.get(&global)
    }

    pub fn contains_global(&self, global: GlobalRef) -> bool {
        self.globals.contains_key(&global)
    }

    pub fn globals(&self) -> impl Iterator<Item = (GlobalRef, &GlobalVariable)> {
        self.globals.iter().map(|(handle, global)| (*handle, global))
    }

    pub fn add_struct_type(&mut self, ty: StructType) -> StructTypeRef {
        let handle = StructTypeRef::new_unique();
        self.struct_types.insert(handle, ty);
        handle
    }

    pub fn remove_struct_type(&mut self, ty: StructTypeRef) -> Option<StructType> {
        self.struct_types.shift_remove(&ty)
    }

    pub fn struct_type(&self, ty: StructTypeRef) -> Option<&StructType> {
        self.struct_types.get(&ty)
    }

    pub fn contains_struct_type(&self, ty: StructTypeRef) -> bool {
        self.struct_types.contains_key(&ty)
    }
}
