use gfxir::{
    metadata::{FunctionMetadataRoot, MdNode, MdRecord, ModuleMetadataRoot},
    module::{FunctionRef, GlobalVariable, Module, StructType},
};
use gfxmeta::{
    deserialize,
    magic::MAX_PUSHED_BUFFERS,
    schema::*,
    serialize,
};
use pretty_assertions::assert_eq;

struct Fixture {
    module: Module,
    kernel: FunctionRef,
    callee: FunctionRef,
    metadata: ModuleMetaData,
}

fn spill(name: &str, offset: u32, size: u32) -> StackFrameEntry {
    StackFrameEntry {
        name: name.to_string(),
        type_repr: "<4 x float>".to_string(),
        entry_type: StackEntryType::Spill,
        size,
        offset,
    }
}

/// A module whose metadata sets every field away from its default.
///
/// Records are spelled out in full so that a field added to the schema must be
/// populated here as well.
fn fully_populated() -> Fixture {
    let mut module = Module::new("populated");
    let kernel = module.add_function("kernel").unwrap();
    let callee = module.add_function("callee").unwrap();
    let local = module.add_global(GlobalVariable {
        name: "slm".into(),
        address_space: 3,
        size_in_bytes: 256,
    });
    let constant = module.add_global(GlobalVariable {
        name: "table".into(),
        address_space: 2,
        size_in_bytes: 64,
    });
    let frame = module.add_struct_type(StructType {
        name: "Frame".into(),
        fields: vec!["i64".into(), "i32".into()],
    });
    let args = module.add_struct_type(StructType {
        name: "Args".into(),
        fields: vec!["ptr".into()],
    });
    let start = module.add_struct_type(StructType {
        name: "FrameStart".into(),
        fields: vec!["i64".into()],
    });

    let comp_opt = CompOptions {
        denorms_are_zero: true,
        correctly_rounded_div_sqrt: true,
        opt_disable: true,
        mad_enable: true,
        no_signed_zeros: true,
        no_nans: true,
        float_rounding_mode: RoundingMode::TowardNegative,
        float_cvt_int_rounding_mode: RoundingMode::Any,
        visa_pre_sched_rp_threshold: 40,
        set_loop_unroll_threshold: 12,
        unsafe_math_optimizations: true,
        finite_math_only: true,
        fast_relaxed_math: true,
        dash_g_specified: true,
        fast_compilation: true,
        use_scratch_space_private_memory: false,
        relaxed_builtins: true,
        subgroup_independent_forward_progress_required: false,
        greater_than_2gb_buffer_required: false,
        greater_than_4gb_buffer_required: false,
        disable_a64_wa: true,
        force_enable_a64_wa: true,
        push_constants_enable: false,
        has_positive_pointer_offset: true,
        has_buffer_offset_arg: true,
        buffer_offset_arg_optional: false,
        has_sub_dw_aligned_ptr_arg: true,
        replace_global_offsets_by_zero: true,
        force_pixel_shader_simd_mode: 16,
        pixel_shader_do_not_abort_on_spill: true,
        uniform_wgs: true,
        disable_vertex_component_packing: true,
        disable_partial_vertex_component_packing: true,
        prefer_bindless_images: true,
        use_bindless_mode: true,
        use_legacy_bindless_mode: false,
        disable_math_refactoring: true,
        atomic_branch: true,
        force_min_simd_size_for_fastest_cs: true,
        enable_fastest_linear_scan: true,
        use_stateless_for_private_memory: true,
        enable_take_global_address: true,
        is_library_compilation: true,
        fast_visa_compile: true,
        match_sin_cos_pi: true,
        capture_compiler_stats: true,
        enable_ze_binary: true,
        exclude_ir_from_ze_binary: true,
        allow_disable_remat_for_cs: true,
        disable_inc_spill_cost_all_addr_taken: true,
        disable_cpso_mask_wa: true,
        wa_force_half_promotion: true,
    };

    let push_slot = |cb_idx: u32| SimplePushInfo {
        cb_idx,
        pushable_address_grf_offset: 2 + cb_idx as i32,
        pushable_offset_grf_offset: 3 + cb_idx as i32,
        offset: 64,
        size: 32,
        is_stateless: cb_idx % 2 == 0,
        is_bindless: true,
        simple_push_loads: [(64, cb_idx as i32), (80, 7)].into_iter().collect(),
    };
    let push_info = PushInfo {
        pushable_addresses: vec![StatelessPushInfo {
            address_offset: 16,
            is_static: true,
        }],
        bindless_push_info: vec![3, 9],
        dynamic_buffer_info: DynamicBufferInfo {
            first_index: 2,
            num_offsets: 3,
        },
        max_number_of_pushed_buffers: 4,
        inline_constant_buffer_slot: 7,
        inline_constant_buffer_offset: 128,
        inline_constant_buffer_grf_offset: 6,
        constants: [
            (ConstantAddress::new(1, 5, 4), 2),
            (ConstantAddress::new(1, 0, 4), 1),
        ]
        .into_iter()
        .collect(),
        inputs: [(
            3,
            SInputDesc {
                index: 3,
                arg_index: 1,
                interpolation_mode: 2,
            },
        )]
        .into_iter()
        .collect(),
        constant_reg: [(8, 2)].into_iter().collect(),
        simple_push_info_arr: [push_slot(0), push_slot(1), push_slot(2), push_slot(3)],
        simple_push_buffer_used: 4,
        push_analysis_wi_infos: vec![ArgDependencyInfoMD { arg_dependency: 4 }],
        inline_rt_global_ptr_offset: 24,
        rt_sync_surf_ptr_offset: 32,
    };

    let ps_info = PixelShaderInfo {
        blend_state_disabled_mask: 0b1010,
        skip_src0_alpha: true,
        dual_source_blending_disabled: true,
        force_enable_simd32: true,
        output_depth: true,
        output_stencil: true,
        output_mask: true,
        blend_to_fill_enabled: true,
        force_early_z: true,
        has_versioned_loop: true,
        force_single_source_rtw_after_dual_source_rtw: true,
        num_samples: 4,
        blend_optimization_mode: vec![1, 0, 2],
        color_output_mask: vec![0xf, 0x7],
    };

    let cs_info = ComputeShaderInfo {
        max_work_group_size: 1024,
        wave_size: 16,
        compute_shader_second_compile: vec![ComputeShaderSecondCompileInputInfoMD {
            runtime_val_res_width_height: 3,
            runtime_val_loop_count: 12,
            runtime_val_constant_buffer_size: 256,
            is_second_compile: true,
            is_row_major: 1,
            num_channels_used: 4,
        }],
        forced_simd_size: 32,
        force_total_grf_num: 256,
        visa_pre_sched_rp_threshold: 50,
        set_loop_unroll_threshold: 8,
        forced_visa_pre_ra_scheduler: true,
        disable_local_id_order_optimizations: true,
        disable_dispatch_along_y: true,
        needed_thread_id_layout: Some(ThreadIdLayout::QuadTile),
        force_tile_y_walk: true,
        atomic_branch: true,
        res_for_hf_packing: vec![vec![0, 1], vec![2, 3]],
    };

    let ms_info = MeshShaderInfo {
        primitive_topology: 1,
        max_num_of_primitives: 128,
        max_num_of_vertices: 64,
        max_num_of_per_primitive_outputs: 4,
        max_num_of_per_vertex_outputs: 8,
        work_group_size: 32,
        work_group_memory_size_in_bytes: 4096,
        index_format: 2,
        subgroup_size: 16,
    };

    let task_info = TaskShaderInfo {
        max_num_of_outputs: 8,
        work_group_size: 64,
        work_group_memory_size_in_bytes: 2048,
        subgroup_size: 32,
    };

    let rt_module = RayTraceModuleInfo {
        ray_query_alloc_size_in_bytes: 64,
        num_continuations: 3,
        rt_async_stack_addrspace: 1,
        rt_async_stack_surface_state_offset: Some(16),
        sw_hot_zone_addrspace: 2,
        sw_hot_zone_surface_state_offset: Some(32),
        sw_stack_addrspace: 3,
        sw_stack_surface_state_offset: Some(128),
        rt_sync_stack_addrspace: 4,
        rt_sync_stack_surface_state_offset: Some(256),
    };

    let mut spill_unions = SpillUnions::new();
    spill_unions.insert("closest_hit.cont.0", vec![spill("a", 0, 16)]);
    spill_unions.insert("closest_hit.cont.1", vec![spill("b", 0, 4), spill("c", 4, 4)]);

    let kernel_facts = FunctionMetaData {
        local_offsets: vec![LocalOffsetMD {
            offset: 16,
            var: local,
        }],
        work_group_walk_order: WorkGroupWalkOrderMD {
            dim0: 1,
            dim1: 0,
            dim2: 2,
        },
        func_args: vec![FuncArgMD {
            buffer_location_index: 0,
            buffer_location_count: 1,
            is_emulation_arg: true,
        }],
        function_type: FunctionType::CallableShader,
        rt_info: RayTraceShaderInfo {
            callable_shader_type: CallableShaderType::ClosestHit,
            is_continuation: true,
            has_trace_ray_payload: true,
            has_hit_attributes: true,
            has_callable_data: true,
            shader_stack_size: 96,
            shader_hash: u64::MAX - 1,
            shader_name: "closest_hit.cont.0".into(),
            parent_name: "closest_hit".into(),
            slot_num: Some(3),
            nos_size: 48,
            entries: vec![spill("ret", 0, 8)],
            spill_unions,
            custom_hit_attr_size_in_bytes: 12,
            types: RayTracingSwTypes {
                frame_start_tys: vec![start],
                argument_tys: vec![args],
                full_frame_tys: vec![frame],
            },
            aliases: vec!["hit_alias".into()],
        },
        res_alloc_md: ResourceAllocMD {
            uavs_num_type: 2,
            srvs_num_type: 3,
            samplers_num_type: 1,
            arg_alloc_md_list: vec![ArgAllocMD {
                r#type: 1,
                extension_type: 0,
                index_type: 3,
            }],
            inline_samplers_md: vec![InlineSamplersMD {
                value: 0x12,
                address_mode: 1,
                index: 1,
                tcx_address_mode: 2,
                tcy_address_mode: 3,
                tcz_address_mode: 4,
                mag_filter_type: 1,
                min_filter_type: 2,
                mip_filter_type: 3,
                compare_func: 5,
                normalized_coords: 1,
                border_color_r: 0.25,
                border_color_g: 0.5,
                border_color_b: 0.75,
                border_color_a: 1.0,
            }],
        },
        max_byte_offsets: vec![64, 128],
        is_initializer: true,
        is_finalizer: true,
        compiled_sub_groups_number: 2,
        has_inline_vme_samplers: true,
        local_size: 256,
        local_id_present: true,
        group_id_present: true,
        private_memory_per_wi: 64,
        global_id_present: true,
        has_sync_rt_calls: true,
        has_non_kernel_arg_load: true,
        has_non_kernel_arg_store: true,
        has_non_kernel_arg_atomic: true,
        user_annotations: vec!["num-thread-per-eu 4".into()],
        arg_address_spaces: vec![1, 2],
        arg_access_qualifiers: vec!["read_write".into(), "read_only".into()],
        arg_types: vec!["float*".into(), "int*".into()],
        arg_base_types: vec!["float*".into(), "int*".into()],
        arg_type_qualifiers: vec!["restrict".into(), "const".into()],
        arg_names: vec!["dst".into(), "src".into()],
    };

    let callee_facts = FunctionMetaData {
        function_type: FunctionType::UserFunction,
        ..Default::default()
    };

    let program_binary = PointerProgramBinaryInfo {
        pointer_buffer_index: 1,
        pointer_offset: 8,
        pointee_address_space: 1,
        pointee_buffer_index: 2,
    };
    let reloc = PointerAddressRelocInfo {
        buffer_offset: 8,
        pointer_size: 8,
        symbol: "table".into(),
    };
    let scope_buffer = InlineProgramScopeBuffer {
        alignment: 16,
        alloc_size: 4,
        buffer: vec![1, 2, 3, 4],
    };

    let metadata = ModuleMetaData {
        is_precise: true,
        comp_opt,
        func_md: [(kernel, kernel_facts), (callee, callee_facts)]
            .into_iter()
            .collect(),
        push_info,
        ps_info,
        cs_info,
        ms_info,
        task_info,
        n_barrier_cnt: 2,
        rt_info: rt_module,
        cur_unique_indirect_idx: 5,
        inline_dyn_textures: [(5, [1, 2, 3, 4])].into_iter().collect(),
        inline_res_info_data: vec![InlineResInfo {
            texture_id: 9,
            surface_type: 1,
            width_or_buffer_size: 640,
            height: 480,
            depth: 1,
            surface_array: 2,
            q_width: 320,
            q_height: 240,
            mip_count: 3,
        }],
        imm_constant: ImmConstantInfo {
            data: vec![0xde, 0xad, 0xbe, 0xef],
        },
        inline_constant_buffers: vec![scope_buffer.clone()],
        inline_global_buffers: vec![InlineProgramScopeBuffer {
            alignment: 8,
            ..scope_buffer
        }],
        global_pointer_program_binary_infos: vec![program_binary],
        constant_pointer_program_binary_infos: vec![PointerProgramBinaryInfo {
            pointer_offset: 16,
            ..program_binary
        }],
        global_buffer_address_reloc_info: vec![reloc.clone()],
        constant_buffer_address_reloc_info: vec![PointerAddressRelocInfo {
            symbol: "lut".into(),
            ..reloc
        }],
        force_lsc_cache_list: [(1, 2)].into_iter().collect(),
        srv_map: vec![SrvMapData {
            resource_range_id: 1,
            index_into_range: 2,
            hf_candidate: true,
            runtime_value: 3,
            ptr_address_space: 4,
        }],
        rasterizer_ordered_byte_address_buffer: vec![0, 2],
        min_nos_push_constant_size: 4,
        inline_program_scope_offsets: [(constant, 32)].into_iter().collect(),
        shader_data: ShaderData { num_replicas: 2 },
        urb_info: UrbLayoutInfo {
            has_64b_vertex_header_input: true,
            has_64b_vertex_header_output: true,
            has_vertex_header: false,
        },
        use_bindless_image: true,
        enable_range_reduce: true,
        allow_match_mad_optimization_for_vs: true,
        disable_mem_opt_for_negative_offset_loads: true,
        stateful_resources_not_aliased: true,
        disable_mix_mode: true,
        private_memory_per_wi: 128,
        private_memory_per_fg: [(kernel, 1024)].into_iter().collect(),
        capabilities: SpirvCapabilities {
            global_variable_decorations_intel: true,
        },
        shader_resource_view_mcs_mask: [u64::MAX, 5],
        computed_depth_mode: 1,
        is_hdc_fast_clear_shader: true,
    };

    Fixture {
        module,
        kernel,
        callee,
        metadata,
    }
}

/// Assert that each listed field of `$value` differs from the same field of
/// `$default`.
macro_rules! assert_fields_differ {
    ($value:expr, $default:expr, [$($field:ident),+ $(,)?]) => {
        $(
            assert_ne!(
                $value.$field, $default.$field,
                concat!("`", stringify!($field), "` is left at its default")
            );
        )+
    };
}

#[test]
fn fixture_moves_every_field_off_its_default() {
    let Fixture {
        kernel, metadata, ..
    } = fully_populated();
    let default = ModuleMetaData::default();

    assert_fields_differ!(metadata, default, [
        is_precise,
        comp_opt,
        func_md,
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
    ]);

    let facts = &metadata.func_md[&kernel];
    let default_facts = FunctionMetaData::default();
    assert_fields_differ!(facts, default_facts, [
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
    ]);

    let rt = &facts.rt_info;
    let default_rt = RayTraceShaderInfo::default();
    assert_fields_differ!(rt, default_rt, [
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
    ]);
}

#[test]
fn fully_populated_metadata_round_trips() {
    let Fixture {
        mut module,
        metadata,
        ..
    } = fully_populated();

    serialize(&metadata, &mut module);
    assert_eq!(deserialize(&module), metadata);
}

#[test]
fn module_without_metadata_reads_as_defaults() {
    let mut module = Module::new("bare");
    module.add_function("f").unwrap();

    assert_eq!(deserialize(&module), ModuleMetaData::default());
}

#[test]
fn serialize_is_idempotent() {
    let Fixture {
        mut module,
        kernel,
        metadata,
        ..
    } = fully_populated();

    serialize(&metadata, &mut module);
    let module_roots = module.metadata.clone();
    let kernel_roots = module.function(kernel).unwrap().metadata.clone();

    serialize(&metadata, &mut module);
    assert_eq!(module.metadata, module_roots);
    assert_eq!(module.function(kernel).unwrap().metadata, kernel_roots);
}

#[test]
fn removed_functions_lose_their_entry() {
    let Fixture {
        mut module,
        kernel,
        callee,
        metadata,
    } = fully_populated();

    serialize(&metadata, &mut module);
    module.remove_function(kernel);

    let read = deserialize(&module);
    assert_eq!(read.func_md.keys().copied().collect::<Vec<_>>(), vec![callee]);
    assert!(read.private_memory_per_fg.is_empty());
}

#[test]
fn entries_for_foreign_functions_are_not_written() {
    let Fixture {
        mut module,
        kernel,
        mut metadata,
        ..
    } = fully_populated();

    let mut other = Module::new("other");
    let foreign = other.add_function("kernel").unwrap();
    metadata.function_mut(foreign).local_size = 7;

    serialize(&metadata, &mut module);
    let read = deserialize(&module);
    assert!(!read.func_md.contains_key(&foreign));
    assert!(read.func_md.contains_key(&kernel));
}

#[test]
fn cloned_function_carries_facts_under_new_handle() {
    let Fixture {
        mut module,
        kernel,
        metadata,
        ..
    } = fully_populated();

    serialize(&metadata, &mut module);
    let clone = module.clone_function(kernel, "kernel.clone").unwrap();

    let read = deserialize(&module);
    assert_ne!(clone, kernel);
    assert_eq!(read.func_md[&clone], read.func_md[&kernel]);
    assert_eq!(read.func_md.len(), 3);
}

#[test]
fn decoding_never_yields_more_than_four_push_slots() {
    let slots: Vec<MdNode> = (0..6)
        .map(|cb_idx| {
            MdRecord::new()
                .with("cb_idx", MdNode::Int(cb_idx))
                .with("size", MdNode::Int(16))
                .into()
        })
        .collect();
    let push_info = MdRecord::new()
        .with("simple_push_info_arr", MdNode::List(slots))
        .with("simple_push_buffer_used", MdNode::Int(6));

    let mut module = Module::new("m");
    module
        .metadata
        .insert::<ModuleMetadataRoot>(MdRecord::new().with("push_info", push_info.into()).into());

    let read = deserialize(&module);
    let push = &read.push_info;
    assert_eq!(push.simple_push_info_arr.len(), MAX_PUSHED_BUFFERS);
    assert_eq!(push.simple_push_info_arr[3].cb_idx, 3);
    assert_eq!(push.simple_push_slots().len(), MAX_PUSHED_BUFFERS);
}

#[test]
fn out_of_range_enum_keeps_default_and_rest_of_record() {
    let mut module = Module::new("m");
    let f = module.add_function("f").unwrap();
    module
        .function_mut(f)
        .unwrap()
        .metadata
        .insert::<FunctionMetadataRoot>(
            MdRecord::new()
                .with("function_type", MdNode::Int(99))
                .with("local_size", MdNode::Int(32))
                .with("introduced_later", MdNode::List(vec![]))
                .into(),
        );

    let facts = &deserialize(&module).func_md[&f];
    assert_eq!(facts.function_type, FunctionType::Kernel);
    assert_eq!(facts.local_size, 32);
}

#[test]
fn malformed_module_fields_keep_defaults() {
    let mut module = Module::new("m");
    module.metadata.insert::<ModuleMetadataRoot>(
        MdRecord::new()
            .with("is_precise", MdNode::Int(1))
            .with("cur_unique_indirect_idx", MdNode::Int(-4))
            .with("n_barrier_cnt", MdNode::Int(3))
            .with(
                "urb_info",
                MdRecord::new()
                    .with("has_64b_vertex_header_input", MdNode::Bool(true))
                    .into(),
            )
            .into(),
    );

    let read = deserialize(&module);
    assert!(!read.is_precise);
    assert_eq!(read.cur_unique_indirect_idx, 0);
    assert_eq!(read.n_barrier_cnt, 3);
    assert!(read.urb_info.has_64b_vertex_header_input);
    assert!(read.urb_info.has_vertex_header);
}
