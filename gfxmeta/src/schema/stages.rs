//! Shader-stage descriptors. Exactly one of them is meaningful for a given
//! compilation unit, the others keep their defaults.
use strum::{EnumIs, FromRepr};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PixelShaderInfo {
    pub blend_state_disabled_mask: u8,
    pub skip_src0_alpha: bool,
    pub dual_source_blending_disabled: bool,
    /// Compile SIMD32 regardless of heuristics.
    pub force_enable_simd32: bool,
    pub output_depth: bool,
    pub output_stencil: bool,
    pub output_mask: bool,
    pub blend_to_fill_enabled: bool,
    pub force_early_z: bool,
    /// Set when loops were versioned by custom loop versioning.
    pub has_versioned_loop: bool,
    pub force_single_source_rtw_after_dual_source_rtw: bool,
    /// Sample count if known: 1, 2, 4, 8 or 16. 0 when unknown.
    pub num_samples: u8,
    pub blend_optimization_mode: Vec<i32>,
    pub color_output_mask: Vec<i32>,
}

/// How thread ids are laid out in a compute dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIs, FromRepr)]
#[repr(u32)]
pub enum ThreadIdLayout {
    /// Along X, Y, Z.
    X = 0,
    /// Tiled along Y only.
    TileY = 1,
    /// 2x2 tiles, as derivative computations expect.
    QuadTile = 2,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ComputeShaderSecondCompileInputInfoMD {
    pub runtime_val_res_width_height: i32,
    pub runtime_val_loop_count: i32,
    pub runtime_val_constant_buffer_size: i32,
    pub is_second_compile: bool,
    pub is_row_major: i32,
    pub num_channels_used: i32,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ComputeShaderInfo {
    pub max_work_group_size: u32,
    /// Forced wave size, 0 when not forced.
    pub wave_size: u32,
    pub compute_shader_second_compile: Vec<ComputeShaderSecondCompileInputInfoMD>,
    /// 0 when not forced.
    pub forced_simd_size: u8,
    /// 0 when not forced.
    pub force_total_grf_num: u32,
    /// 0 for the default.
    pub visa_pre_sched_rp_threshold: u32,
    /// 0 for the default.
    pub set_loop_unroll_threshold: u32,
    pub forced_visa_pre_ra_scheduler: bool,
    /// Disables dispatch along Y and tiled order optimizations.
    pub disable_local_id_order_optimizations: bool,
    pub disable_dispatch_along_y: bool,
    /// `None` when there is no layout requirement.
    pub needed_thread_id_layout: Option<ThreadIdLayout>,
    pub force_tile_y_walk: bool,
    pub atomic_branch: bool,
    /// Resources eligible for half-float packing, as
    /// `[resource_range_id, index_into_range]` pairs.
    pub res_for_hf_packing: Vec<Vec<u32>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeshShaderInfo {
    pub primitive_topology: u32,
    pub max_num_of_primitives: u32,
    pub max_num_of_vertices: u32,
    pub max_num_of_per_primitive_outputs: u32,
    pub max_num_of_per_vertex_outputs: u32,
    pub work_group_size: u32,
    pub work_group_memory_size_in_bytes: u32,
    pub index_format: u32,
    /// Forced wave size, 0 when not forced.
    pub subgroup_size: u32,
}

impl Default for MeshShaderInfo {
    fn default() -> Self {
        Self {
            // Topology and index format default to their "unset" terminals.
            primitive_topology: 3,
            max_num_of_primitives: 0,
            max_num_of_vertices: 0,
            max_num_of_per_primitive_outputs: 0,
            max_num_of_per_vertex_outputs: 0,
            work_group_size: 0,
            work_group_memory_size_in_bytes: 0,
            index_format: 6,
            subgroup_size: 0,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TaskShaderInfo {
    pub max_num_of_outputs: u32,
    pub work_group_size: u32,
    pub work_group_memory_size_in_bytes: u32,
    pub subgroup_size: u32,
}
