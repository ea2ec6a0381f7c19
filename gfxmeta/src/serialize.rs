//! Attach typed metadata to a module and read it back.
//!
//! Module-level facts live under [`ModuleMetadataRoot`] on the module store.
//! Each function carrying facts gets a [`FunctionMetadataRoot`] on its own
//! store, so removing or cloning a function takes its facts along.
use gfxir::{
    metadata::{
        CoarsePhase, FunctionMetadataRoot, MdNode, MetadataKey, ModuleMetadataRoot, PixelPhase,
    },
    module::{FunctionRef, Module},
};
use log::{debug, trace, warn};

use crate::{
    codec::{MdCodec, RecordExt},
    schema::{FunctionMetaData, ModuleMetaData},
};

/// Layout version written next to the module facts.
pub const SCHEMA_VERSION: u32 = 1;

const SCHEMA_VERSION_FIELD: &str = "schema_version";

/// Write `metadata` into `module`.
///
/// Roots written by a previous call are replaced, so serializing the same
/// metadata twice leaves the module unchanged. Functions without an entry in
/// `func_md` keep whatever they carry. Entries for functions that are no
/// longer part of the module are skipped.
pub fn serialize(metadata: &ModuleMetaData, module: &mut Module) {
    let mut root = metadata.encode();
    if let MdNode::Record(record) = &mut root {
        record.push(SCHEMA_VERSION_FIELD, SCHEMA_VERSION.encode());
    }

    module.metadata.remove::<ModuleMetadataRoot>();
    module.metadata.insert::<ModuleMetadataRoot>(root);

    let mut written = 0usize;
    for (handle, facts) in &metadata.func_md {
        let Some(function) = module.function_mut(*handle) else {
            debug!("skipping metadata of {handle}: function is not part of the module");
            continue;
        };
        function.metadata.remove::<FunctionMetadataRoot>();
        function
            .metadata
            .insert::<FunctionMetadataRoot>(facts.encode());
        written += 1;
    }

    debug!(
        "serialized metadata of module `{}` ({written} of {} functions)",
        module.name,
        metadata.func_md.len()
    );
}

/// Read the metadata attached to `module`.
///
/// Never fails: whatever is missing or malformed takes its default value.
/// References to functions, globals or struct types that no longer exist in
/// the module are dropped.
pub fn deserialize(module: &Module) -> ModuleMetaData {
    let mut metadata = match module.metadata.get::<ModuleMetadataRoot>() {
        Some(root) => {
            check_schema_version(root);
            ModuleMetaData::decode(root).unwrap_or_else(|| {
                warn!(
                    "`{}` root of module `{}` is not a record, using defaults",
                    ModuleMetadataRoot::NAME,
                    module.name
                );
                ModuleMetaData::default()
            })
        }
        None => ModuleMetaData::default(),
    };

    for (handle, function) in module.functions() {
        let Some(root) = function.metadata.get::<FunctionMetadataRoot>() else {
            continue;
        };
        let facts = FunctionMetaData::decode(root).unwrap_or_else(|| {
            warn!(
                "`{}` root of function `{}` is not a record, using defaults",
                FunctionMetadataRoot::NAME,
                function.name
            );
            FunctionMetaData::default()
        });
        metadata.func_md.insert(handle, facts);
    }

    prune_dead_references(&mut metadata, module);
    debug!(
        "deserialized metadata of module `{}` ({} functions)",
        module.name,
        metadata.func_md.len()
    );
    metadata
}

fn check_schema_version(root: &MdNode) {
    let Some(record) = root.as_record() else {
        return;
    };
    let mut version = 0u32;
    record.read(SCHEMA_VERSION_FIELD, &mut version);
    if version > SCHEMA_VERSION {
        debug!(
            "module metadata written with schema version {version}, reading as {SCHEMA_VERSION}"
        );
    }
}

fn prune_dead_references(metadata: &mut ModuleMetaData, module: &Module) {
    metadata.private_memory_per_fg.retain(|function, _| {
        let alive = module.contains_function(*function);
        if !alive {
            trace!("dropping private memory size of dead function {function}");
        }
        alive
    });
    metadata
        .inline_program_scope_offsets
        .retain(|global, _| module.contains_global(*global));

    for facts in metadata.func_md.values_mut() {
        facts
            .local_offsets
            .retain(|local| module.contains_global(local.var));

        let types = &mut facts.rt_info.types;
        for tys in [
            &mut types.frame_start_tys,
            &mut types.argument_tys,
            &mut types.full_frame_tys,
        ] {
            tys.retain(|ty| module.contains_struct_type(*ty));
        }
    }
}

fn set_phase<K: MetadataKey>(module: &mut Module, function: FunctionRef) {
    module.metadata.insert::<K>(function.encode());
}

fn phase<K: MetadataKey>(module: &Module) -> Option<FunctionRef> {
    module
        .metadata
        .get::<K>()
        .and_then(FunctionRef::decode)
        .filter(|function| module.contains_function(*function))
}

/// Record `function` as the coarse-rate phase of a multi-rate pixel shader.
pub fn set_coarse_phase(module: &mut Module, function: FunctionRef) {
    set_phase::<CoarsePhase>(module, function);
}

/// The coarse-rate phase, if recorded and still part of the module.
pub fn coarse_phase(module: &Module) -> Option<FunctionRef> {
    phase::<CoarsePhase>(module)
}

/// Record `function` as the per-pixel phase of a multi-rate pixel shader.
pub fn set_pixel_phase(module: &mut Module, function: FunctionRef) {
    set_phase::<PixelPhase>(module, function);
}

/// The per-pixel phase, if recorded and still part of the module.
pub fn pixel_phase(module: &Module) -> Option<FunctionRef> {
    phase::<PixelPhase>(module)
}
