//! Node layout of every schema record.
use gfxir::metadata::MdNode;

use crate::{codec::MdCodec, schema::*};

md_enum!(
    RoundingMode,
    CallableShaderType,
    StackEntryType,
    FunctionType,
    ThreadIdLayout,
);

md_record!(CompOptions {
    denorms_are_zero,
    correctly_rounded_div_sqrt,
    opt_disable,
    mad_enable,
    no_signed_zeros,
    no_nans,
    float_rounding_mode,
    float_cvt_int_rounding_mode,
    visa_pre_sched_rp_threshold,
    set_loop_unroll_threshold,
    unsafe_math_optimizations,
    finite_math_only,
    fast_relaxed_math,
    dash_g_specified,
    fast_compilation,
    use_scratch_space_private_memory,
    relaxed_builtins,
    subgroup_independent_forward_progress_required,
    greater_than_2gb_buffer_required,
    greater_than_4gb_buffer_required,
    disable_a64_wa,
    force_enable_a64_wa,
    push_constants_enable,
    has_positive_pointer_offset,
    has_buffer_offset_arg,
    buffer_offset_arg_optional,
    has_sub_dw_aligned_ptr_arg,
    replace_global_offsets_by_zero,
    force_pixel_shader_simd_mode,
    pixel_shader_do_not_abort_on_spill,
    uniform_wgs,
    disable_vertex_component_packing,
    disable_partial_vertex_component_packing,
    prefer_bindless_images,
    use_bindless_mode,
    use_legacy_bindless_mode,
    disable_math_refactoring,
    atomic_branch,
    force_min_simd_size_for_fastest_cs,
    enable_fastest_linear_scan,
    use_stateless_for_private_memory,
    enable_take_global_address,
    is_library_compilation,
    fast_visa_compile,
    match_sin_cos_pi,
    capture_compiler_stats,
    enable_ze_binary,
    exclude_ir_from_ze_binary,
    allow_disable_remat_for_cs,
    disable_inc_spill_cost_all_addr_taken,
    disable_cpso_mask_wa,
    wa_force_half_promotion,
});

// Raytracing

md_record!(StackFrameEntry {
    name,
    type_repr,
    entry_type,
    size,
    offset,
});

md_record!(StackFrameSpillUnion {
    continuation_name,
    entries,
});

impl MdCodec for SpillUnions {
    fn encode(&self) -> MdNode {
        MdNode::List(
            self.iter()
                .map(|(continuation, entries)| {
                    StackFrameSpillUnion {
                        continuation_name: continuation.to_string(),
                        entries: entries.to_vec(),
                    }
                    .encode()
                })
                .collect(),
        )
    }

    fn decode(node: &MdNode) -> Option<Self> {
        Some(
            node.as_list()?
                .iter()
                .filter_map(StackFrameSpillUnion::decode)
                .collect(),
        )
    }
}

md_record!(RayTracingSwTypes {
    frame_start_tys,
    argument_tys,
    full_frame_tys,
});

md_record!(RayTraceModuleInfo {
    ray_query_alloc_size_in_bytes,
    num_continuations,
    rt_async_stack_addrspace,
    rt_async_stack_surface_state_offset,
    sw_hot_zone_addrspace,
    sw_hot_zone_surface_state_offset,
    sw_stack_addrspace,
    sw_stack_surface_state_offset,
    rt_sync_stack_addrspace,
    rt_sync_stack_surface_state_offset,
});

md_record!(RayTraceShaderInfo {
    callable_shader_type,
    is_continuation,
    has_trace_ray_payload,
    has_hit_attributes,
    has_callable_data,
    shader_stack_size,
    shader_hash,
    shader_name,
    parent_name,
    slot_num,
    nos_size,
    entries,
    spill_unions,
    custom_hit_attr_size_in_bytes,
    types,
    aliases,
});

// Push constants

md_record!(ConstantAddress { buf_id, elt_id, size });

md_record!(SInputDesc {
    index,
    arg_index,
    interpolation_mode,
});

md_record!(SimplePushInfo {
    cb_idx,
    pushable_address_grf_offset,
    pushable_offset_grf_offset,
    offset,
    size,
    is_stateless,
    is_bindless,
    simple_push_loads,
});

md_record!(StatelessPushInfo {
    address_offset,
    is_static,
});

md_record!(DynamicBufferInfo {
    first_index,
    num_offsets,
});

md_record!(ArgDependencyInfoMD { arg_dependency });

md_record!(PushInfo {
    pushable_addresses,
    bindless_push_info,
    dynamic_buffer_info,
    max_number_of_pushed_buffers,
    inline_constant_buffer_slot,
    inline_constant_buffer_offset,
    inline_constant_buffer_grf_offset,
    constants,
    inputs,
    constant_reg,
    simple_push_info_arr,
    simple_push_buffer_used,
    push_analysis_wi_infos,
    inline_rt_global_ptr_offset,
    rt_sync_surf_ptr_offset,
});

// Stage descriptors

md_record!(PixelShaderInfo {
    blend_state_disabled_mask,
    skip_src0_alpha,
    dual_source_blending_disabled,
    force_enable_simd32,
    output_depth,
    output_stencil,
    output_mask,
    blend_to_fill_enabled,
    force_early_z,
    has_versioned_loop,
    force_single_source_rtw_after_dual_source_rtw,
    num_samples,
    blend_optimization_mode,
    color_output_mask,
});

md_record!(ComputeShaderSecondCompileInputInfoMD {
    runtime_val_res_width_height,
    runtime_val_loop_count,
    runtime_val_constant_buffer_size,
    is_second_compile,
    is_row_major,
    num_channels_used,
});

md_record!(ComputeShaderInfo {
    max_work_group_size,
    wave_size,
    compute_shader_second_compile,
    forced_simd_size,
    force_total_grf_num,
    visa_pre_sched_rp_threshold,
    set_loop_unroll_threshold,
    forced_visa_pre_ra_scheduler,
    disable_local_id_order_optimizations,
    disable_dispatch_along_y,
    needed_thread_id_layout,
    force_tile_y_walk,
    atomic_branch,
    res_for_hf_packing,
});

md_record!(MeshShaderInfo {
    primitive_topology,
    max_num_of_primitives,
    max_num_of_vertices,
    max_num_of_per_primitive_outputs,
    max_num_of_per_vertex_outputs,
    work_group_size,
    work_group_memory_size_in_bytes,
    index_format,
    subgroup_size,
});

md_record!(TaskShaderInfo {
    max_num_of_outputs,
    work_group_size,
    work_group_memory_size_in_bytes,
    subgroup_size,
});

// Function facts

md_record!(ArgAllocMD {
    r#type = "type",
    extension_type,
    index_type,
});

md_record!(InlineSamplersMD {
    value,
    address_mode,
    index,
    tcx_address_mode,
    tcy_address_mode,
    tcz_address_mode,
    mag_filter_type,
    min_filter_type,
    mip_filter_type,
    compare_func,
    normalized_coords,
    border_color_r,
    border_color_g,
    border_color_b,
    border_color_a,
});

md_record!(ResourceAllocMD {
    uavs_num_type,
    srvs_num_type,
    samplers_num_type,
    arg_alloc_md_list,
    inline_samplers_md,
});

md_record!(LocalOffsetMD { offset, var });

md_record!(WorkGroupWalkOrderMD { dim0, dim1, dim2 });

md_record!(FuncArgMD {
    buffer_location_index,
    buffer_location_count,
    is_emulation_arg,
});

md_record!(FunctionMetaData {
    local_offsets,
    work_group_walk_order,
    func_args,
    function_type,
    rt_info,
    res_alloc_md,
    max_byte_offsets,
    is_initializer,
    is_finalizer,
    compiled_sub_groups_number,
    has_inline_vme_samplers,
    local_size,
    local_id_present,
    group_id_present,
    private_memory_per_wi,
    global_id_present,
    has_sync_rt_calls,
    has_non_kernel_arg_load,
    has_non_kernel_arg_store,
    has_non_kernel_arg_atomic,
    user_annotations,
    arg_address_spaces,
    arg_access_qualifiers,
    arg_types,
    arg_base_types,
    arg_type_qualifiers,
    arg_names,
});

// Module facts

md_record!(InlineResInfo {
    texture_id,
    surface_type,
    width_or_buffer_size,
    height,
    depth,
    surface_array,
    q_width,
    q_height,
    mip_count,
});

md_record!(InlineProgramScopeBuffer {
    alignment,
    alloc_size,
    buffer,
});

md_record!(ImmConstantInfo { data });

md_record!(PointerProgramBinaryInfo {
    pointer_buffer_index,
    pointer_offset,
    pointee_address_space,
    pointee_buffer_index,
});

md_record!(PointerAddressRelocInfo {
    buffer_offset,
    pointer_size,
    symbol,
});

md_record!(ShaderData { num_replicas });

md_record!(SrvMapData {
    resource_range_id,
    index_into_range,
    hf_candidate,
    runtime_value,
    ptr_address_space,
});

md_record!(UrbLayoutInfo {
    has_64b_vertex_header_input,
    has_64b_vertex_header_output,
    has_vertex_header,
});

md_record!(SpirvCapabilities {
    global_variable_decorations_intel,
});

// Per-function facts are attached to each function, not to the module root.
md_record!(ModuleMetaData {
    is_precise,
    comp_opt,
    push_info,
    ps_info,
    cs_info,
    ms_info,
    task_info,
    n_barrier_cnt,
    rt_info,
    cur_unique_indirect_idx,
    inline_dyn_textures,
    inline_res_info_data,
    imm_constant,
    inline_constant_buffers,
    inline_global_buffers,
    global_pointer_program_binary_infos,
    constant_pointer_program_binary_infos,
    global_buffer_address_reloc_info,
    constant_buffer_address_reloc_info,
    force_lsc_cache_list,
    srv_map,
    rasterizer_ordered_byte_address_buffer,
    min_nos_push_constant_size,
    inline_program_scope_offsets,
    shader_data,
    urb_info,
    use_bindless_image,
    enable_range_reduce,
    allow_match_mad_optimization_for_vs,
    disable_mem_opt_for_negative_offset_loads,
    stateful_resources_not_aliased,
    disable_mix_mode,
    private_memory_per_wi,
    private_memory_per_fg,
    capabilities,
    shader_resource_view_mcs_mask,
    computed_depth_mode,
    is_hdc_fast_clear_shader,
});
