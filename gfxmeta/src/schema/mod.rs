//! Typed compiler metadata.
//!
//! [`ModuleMetaData`] is the root record for one compilation unit. It owns a
//! [`FunctionMetaData`] per function that has facts recorded, keyed by the
//! function's handle in the IR module.
//!
//! Every field has a documented default so that a fresh record, or one read
//! back from a module carrying nothing, is always valid to query.
use std::collections::BTreeMap;

use gfxir::module::{FunctionRef, GlobalRef};
use indexmap::IndexMap;

use crate::magic::{DEFAULT_INDIRECT_IDX, NUM_SHADER_RESOURCE_VIEW_SIZE};

pub mod function;
pub mod options;
pub mod push;
pub mod raytracing;
pub mod stages;

pub use function::*;
pub use options::*;
pub use push::*;
pub use raytracing::*;
pub use stages::*;

/// Description of an inline resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InlineResInfo {
    pub texture_id: u32,
    pub surface_type: u32,
    pub width_or_buffer_size: u32,
    pub height: u32,
    pub depth: u32,
    pub surface_array: u32,
    pub q_width: u32,
    pub q_height: u32,
    pub mip_count: u32,
}

impl Default for InlineResInfo {
    fn default() -> Self {
        Self {
            texture_id: 0,
            // Null surface.
            surface_type: 0x7,
            width_or_buffer_size: 0,
            height: 0,
            depth: 0,
            surface_array: 0,
            q_width: 0,
            q_height: 0,
            mip_count: 0,
        }
    }
}

/// A program-scope buffer whose contents are known at compile time.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct InlineProgramScopeBuffer {
    pub alignment: i32,
    pub alloc_size: u32,
    pub buffer: Vec<u8>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct ImmConstantInfo {
    pub data: Vec<u8>,
}

/// A pointer stored in a program-scope buffer that must be relocated.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointerProgramBinaryInfo {
    pub pointer_buffer_index: i32,
    pub pointer_offset: i32,
    pub pointee_address_space: i32,
    pub pointee_buffer_index: i32,
}

/// A symbol address to patch into a program-scope buffer.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct PointerAddressRelocInfo {
    pub buffer_offset: u32,
    pub pointer_size: u32,
    pub symbol: String,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderData {
    pub num_replicas: u32,
}

/// Mapping of a shader resource view.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SrvMapData {
    pub resource_range_id: u32,
    pub index_into_range: u32,
    pub hf_candidate: bool,
    pub runtime_value: u32,
    pub ptr_address_space: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UrbLayoutInfo {
    pub has_64b_vertex_header_input: bool,
    pub has_64b_vertex_header_output: bool,
    pub has_vertex_header: bool,
}

impl Default for UrbLayoutInfo {
    fn default() -> Self {
        Self {
            has_64b_vertex_header_input: false,
            has_64b_vertex_header_output: false,
            has_vertex_header: true,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpirvCapabilities {
    pub global_variable_decorations_intel: bool,
}

/// Compiler facts for an entire module.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleMetaData {
    pub is_precise: bool,
    pub comp_opt: CompOptions,
    /// Per-function facts in insertion order. A function without an entry has
    /// no facts recorded yet, which is not the same as all-default facts.
    pub func_md: IndexMap<FunctionRef, FunctionMetaData>,
    pub push_info: PushInfo,
    pub ps_info: PixelShaderInfo,
    pub cs_info: ComputeShaderInfo,
    pub ms_info: MeshShaderInfo,
    pub task_info: TaskShaderInfo,
    pub n_barrier_cnt: u32,
    pub rt_info: RayTraceModuleInfo,
    pub cur_unique_indirect_idx: u32,
    pub inline_dyn_textures: BTreeMap<u32, [u32; 4]>,
    pub inline_res_info_data: Vec<InlineResInfo>,
    pub imm_constant: ImmConstantInfo,
    pub inline_constant_buffers: Vec<InlineProgramScopeBuffer>,
    pub inline_global_buffers: Vec<InlineProgramScopeBuffer>,
    pub global_pointer_program_binary_infos: Vec<PointerProgramBinaryInfo>,
    pub constant_pointer_program_binary_infos: Vec<PointerProgramBinaryInfo>,
    pub global_buffer_address_reloc_info: Vec<PointerAddressRelocInfo>,
    pub constant_buffer_address_reloc_info: Vec<PointerAddressRelocInfo>,
    pub force_lsc_cache_list: BTreeMap<u32, u32>,
    pub srv_map: Vec<SrvMapData>,
    pub rasterizer_ordered_byte_address_buffer: Vec<u32>,
    pub min_nos_push_constant_size: u32,
    pub inline_program_scope_offsets: IndexMap<GlobalRef, i32>,
    pub shader_data: ShaderData,
    pub urb_info: UrbLayoutInfo,
    pub use_bindless_image: bool,
    pub enable_range_reduce: bool,
    pub allow_match_mad_optimization_for_vs: bool,
    pub disable_mem_opt_for_negative_offset_loads: bool,
    /// Resources bound to different bindings may be assumed not to alias.
    pub stateful_resources_not_aliased: bool,
    pub disable_mix_mode: bool,
    pub private_memory_per_wi: u32,
    pub private_memory_per_fg: BTreeMap<FunctionRef, u32>,
    pub capabilities: SpirvCapabilities,
    pub shader_resource_view_mcs_mask: [u64; NUM_SHADER_RESOURCE_VIEW_SIZE],
    /// 0 when depth mode is off.
    pub computed_depth_mode: u32,
    pub is_hdc_fast_clear_shader: bool,
}

impl Default for ModuleMetaData {
    fn default() -> Self {
        Self {
            is_precise: false,
            comp_opt: CompOptions::default(),
            func_md: IndexMap::new(),
            push_info: PushInfo::default(),
            ps_info: PixelShaderInfo::default(),
            cs_info: ComputeShaderInfo::default(),
            ms_info: MeshShaderInfo::default(),
            task_info: TaskShaderInfo::default(),
            n_barrier_cnt: 0,
            rt_info: RayTraceModuleInfo::default(),
            cur_unique_indirect_idx: DEFAULT_INDIRECT_IDX,
            inline_dyn_textures: BTreeMap::new(),
            inline_res_info_data: Vec::new(),
            imm_constant: ImmConstantInfo::default(),
            inline_constant_buffers: Vec::new(),
            inline_global_buffers: Vec::new(),
            global_pointer_program_binary_infos: Vec::new(),
            constant_pointer_program_binary_infos: Vec::new(),
            global_buffer_address_reloc_info: Vec::new(),
            constant_buffer_address_reloc_info: Vec::new(),
            force_lsc_cache_list: BTreeMap::new(),
            srv_map: Vec::new(),
            rasterizer_ordered_byte_address_buffer: Vec::new(),
            min_nos_push_constant_size: 0,
            inline_program_scope_offsets: IndexMap::new(),
            shader_data: ShaderData::default(),
            urb_info: UrbLayoutInfo::default(),
            use_bindless_image: false,
            enable_range_reduce: false,
            allow_match_mad_optimization_for_vs: false,
            disable_mem_opt_for_negative_offset_loads: false,
            stateful_resources_not_aliased: false,
            disable_mix_mode: false,
            private_memory_per_wi: 0,
            private_memory_per_fg: BTreeMap::new(),
            capabilities: SpirvCapabilities::default(),
            shader_resource_view_mcs_mask: [0; NUM_SHADER_RESOURCE_VIEW_SIZE],
            computed_depth_mode: 0,
            is_hdc_fast_clear_shader: false,
        }
    }
}

impl ModuleMetaData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Facts for `function`, creating an all-default entry on first use.
    pub fn function_mut(&mut self, function: FunctionRef) -> &mut FunctionMetaData {
        self.func_md.entry(function).or_default()
    }

    /// Drop everything recorded about `function`.
    pub fn forget_function(&mut self, function: FunctionRef) -> Option<FunctionMetaData> {
        self.private_memory_per_fg.remove(&function);
        self.func_md.shift_remove(&function)
    }
}
