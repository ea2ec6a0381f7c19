//! Raytracing facts: module-wide stack configuration and per-shader stack
//! frame layouts.
use gfxir::module::StructTypeRef;
use indexmap::IndexMap;
use strum::{EnumIs, FromRepr};

use crate::magic::UNASSIGNED_INDEX;

/// Kind of raytracing shader a function implements.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, EnumIs, FromRepr)]
#[repr(u32)]
pub enum CallableShaderType {
    RayGen = 0,
    Miss = 1,
    ClosestHit = 2,
    Intersection = 3,
    AnyHit = 4,
    Callable = 5,
    /// Entry point reached through indirect call-stack dispatch.
    CallStackHandler = 6,
    /// No raytracing shader type has been assigned.
    #[default]
    Undefined = 7,
}

/// What a stack frame entry holds.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, EnumIs, FromRepr)]
#[repr(u32)]
pub enum StackEntryType {
    ReturnIp = 0,
    Argument = 1,
    Alloca = 2,
    Spill = 3,
    #[default]
    Unknown = 4,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct StackFrameEntry {
    /// Name of the value, empty if it has none.
    pub name: String,
    /// Textual form of the value's type.
    pub type_repr: String,
    pub entry_type: StackEntryType,
    /// Bytes occupied on the stack.
    pub size: u32,
    /// Offset from the base of the frame.
    pub offset: u32,
}

impl StackFrameEntry {
    /// One past the last byte of the entry.
    pub fn end(&self) -> u64 {
        self.offset as u64 + self.size as u64
    }
}

/// The spill region of one continuation, seen through the layout of the trace
/// call that produced it.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct StackFrameSpillUnion {
    pub continuation_name: String,
    pub entries: Vec<StackFrameEntry>,
}

/// Call-site scoped layouts of the spill region.
///
/// Live values differ from one trace call to the next, so the same spill
/// storage is described by a different entry list for every continuation.
/// Layouts are keyed by continuation name: a continuation has at most one
/// layout and picking a layout is a lookup, never an offset guess.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SpillUnions {
    layouts: IndexMap<String, Vec<StackFrameEntry>>,
}

impl SpillUnions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the layout used by `continuation`, replacing any previous one.
    pub fn insert(
        &mut self,
        continuation: impl Into<String>,
        entries: Vec<StackFrameEntry>,
    ) -> Option<Vec<StackFrameEntry>> {
        self.layouts.insert(continuation.into(), entries)
    }

    pub fn layout_for(&self, continuation: &str) -> Option<&[StackFrameEntry]> {
        self.layouts.get(continuation).map(Vec::as_slice)
    }

    pub fn remove(&mut self, continuation: &str) -> Option<Vec<StackFrameEntry>> {
        self.layouts.shift_remove(continuation)
    }

    /// Layouts in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[StackFrameEntry])> {
        self.layouts
            .iter()
            .map(|(name, entries)| (name.as_str(), entries.as_slice()))
    }

    /// Bytes the spill region must span to hold the largest layout.
    pub fn region_size(&self) -> u64 {
        self.layouts
            .values()
            .flatten()
            .map(StackFrameEntry::end)
            .max()
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }
}

impl FromIterator<StackFrameSpillUnion> for SpillUnions {
    fn from_iter<T: IntoIterator<Item = StackFrameSpillUnion>>(iter: T) -> Self {
        let mut unions = SpillUnions::new();
        for union in iter {
            unions.insert(union.continuation_name, union.entries);
        }
        unions
    }
}

/// Named struct types used for structured accesses to the software stack.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RayTracingSwTypes {
    pub frame_start_tys: Vec<StructTypeRef>,
    pub argument_tys: Vec<StructTypeRef>,
    pub full_frame_tys: Vec<StructTypeRef>,
}

/// Raytracing facts common to all shaders of the module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RayTraceModuleInfo {
    /// Size of one synchronous stack entry the driver must allocate.
    pub ray_query_alloc_size_in_bytes: u32,
    /// Number of continuations produced when splitting shaders. Used to decide
    /// between inlining and indirect dispatch of continuations.
    pub num_continuations: u32,

    pub rt_async_stack_addrspace: u32,
    pub rt_async_stack_surface_state_offset: Option<u32>,

    pub sw_hot_zone_addrspace: u32,
    pub sw_hot_zone_surface_state_offset: Option<u32>,

    pub sw_stack_addrspace: u32,
    pub sw_stack_surface_state_offset: Option<u32>,

    pub rt_sync_stack_addrspace: u32,
    pub rt_sync_stack_surface_state_offset: Option<u32>,
}

impl Default for RayTraceModuleInfo {
    fn default() -> Self {
        Self {
            ray_query_alloc_size_in_bytes: 0,
            num_continuations: UNASSIGNED_INDEX,
            rt_async_stack_addrspace: UNASSIGNED_INDEX,
            rt_async_stack_surface_state_offset: None,
            sw_hot_zone_addrspace: UNASSIGNED_INDEX,
            sw_hot_zone_surface_state_offset: None,
            sw_stack_addrspace: UNASSIGNED_INDEX,
            sw_stack_surface_state_offset: None,
            rt_sync_stack_addrspace: UNASSIGNED_INDEX,
            rt_sync_stack_surface_state_offset: None,
        }
    }
}

/// Raytracing facts of a single shader.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RayTraceShaderInfo {
    pub callable_shader_type: CallableShaderType,
    pub is_continuation: bool,
    pub has_trace_ray_payload: bool,
    pub has_hit_attributes: bool,
    pub has_callable_data: bool,
    pub shader_stack_size: u32,
    pub shader_hash: u64,
    pub shader_name: String,
    /// Name of the original shader when this is a continuation.
    pub parent_name: String,
    /// Shader identifier slot a continuation has been promoted to, if any.
    pub slot_num: Option<u32>,
    /// Size in bytes of the cross-thread constant data.
    pub nos_size: u32,
    /// Arguments, allocas and spills on the shader's stack frame.
    pub entries: Vec<StackFrameEntry>,
    pub spill_unions: SpillUnions,
    pub custom_hit_attr_size_in_bytes: u32,
    pub types: RayTracingSwTypes,
    /// Other names a primary shader identifier goes by.
    pub aliases: Vec<String>,
}
