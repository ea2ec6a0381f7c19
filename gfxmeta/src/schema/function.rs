use gfxir::module::GlobalRef;
use strum::{EnumIs, FromRepr};

use crate::schema::raytracing::RayTraceShaderInfo;

/// Role of a function in the compilation unit.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, EnumIs, FromRepr)]
#[repr(u32)]
pub enum FunctionType {
    #[default]
    Kernel = 0,
    CallableShader = 1,
    UserFunction = 2,
}

/// Kind of resource an argument is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIs, FromRepr)]
#[repr(i32)]
pub enum ResourceType {
    Other = 0,
    Uav = 1,
    Srv = 2,
    Sampler = 3,
    BindlessUav = 4,
    BindlessSampler = 5,
    Default = 6,
}

/// Media extension of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIs, FromRepr)]
#[repr(i32)]
pub enum ResourceExtensionType {
    NonExtension = 0,
    MediaResource = 1,
    MediaResourceBlock = 2,
    MediaSampler = 3,
    MediaSamplerConvolve = 4,
    MediaSamplerErode = 5,
    MediaSamplerDilate = 6,
    MediaSamplerMinMaxFilter = 7,
    MediaSamplerMinMax = 8,
    MediaSamplerCentroid = 9,
    MediaSamplerBoolCentroid = 10,
    MediaSamplerBoolSum = 11,
    MediaSamplerLbp = 12,
    MediaSamplerFloodFill = 13,
    MediaSamplerCorrelation = 14,
    Default = 15,
}

/// Resource allocation of one argument. `-1` marks an unset field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArgAllocMD {
    pub r#type: i32,
    pub extension_type: i32,
    pub index_type: i32,
}

impl Default for ArgAllocMD {
    fn default() -> Self {
        Self {
            r#type: -1,
            extension_type: -1,
            index_type: -1,
        }
    }
}

impl ArgAllocMD {
    pub fn resource_type(&self) -> Option<ResourceType> {
        ResourceType::from_repr(self.r#type)
    }

    pub fn resource_extension_type(&self) -> Option<ResourceExtensionType> {
        ResourceExtensionType::from_repr(self.extension_type)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct InlineSamplersMD {
    pub value: i32,
    pub address_mode: i32,
    pub index: i32,
    pub tcx_address_mode: i32,
    pub tcy_address_mode: i32,
    pub tcz_address_mode: i32,
    pub mag_filter_type: i32,
    pub min_filter_type: i32,
    pub mip_filter_type: i32,
    pub compare_func: i32,
    pub normalized_coords: i32,
    pub border_color_r: f32,
    pub border_color_g: f32,
    pub border_color_b: f32,
    pub border_color_a: f32,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ResourceAllocMD {
    pub uavs_num_type: i32,
    pub srvs_num_type: i32,
    pub samplers_num_type: i32,
    pub arg_alloc_md_list: Vec<ArgAllocMD>,
    pub inline_samplers_md: Vec<InlineSamplersMD>,
}

/// Offset of a local-memory variable.
///
/// A default entry points at [`GlobalRef::NIL`] and is pruned when read back
/// from a module.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocalOffsetMD {
    pub offset: i32,
    pub var: GlobalRef,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WorkGroupWalkOrderMD {
    pub dim0: i32,
    pub dim1: i32,
    pub dim2: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FuncArgMD {
    pub buffer_location_index: i32,
    pub buffer_location_count: i32,
    pub is_emulation_arg: bool,
}

impl Default for FuncArgMD {
    fn default() -> Self {
        Self {
            buffer_location_index: -1,
            buffer_location_count: -1,
            is_emulation_arg: false,
        }
    }
}

/// Facts recorded about one function.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FunctionMetaData {
    pub local_offsets: Vec<LocalOffsetMD>,
    pub work_group_walk_order: WorkGroupWalkOrderMD,
    pub func_args: Vec<FuncArgMD>,
    pub function_type: FunctionType,
    pub rt_info: RayTraceShaderInfo,
    pub res_alloc_md: ResourceAllocMD,
    pub max_byte_offsets: Vec<u32>,
    pub is_initializer: bool,
    pub is_finalizer: bool,
    pub compiled_sub_groups_number: u32,
    pub has_inline_vme_samplers: bool,
    pub local_size: i32,
    pub local_id_present: bool,
    pub group_id_present: bool,
    pub private_memory_per_wi: i32,
    pub global_id_present: bool,
    /// The function uses synchronous raytracing.
    pub has_sync_rt_calls: bool,

    /// Loads, stores and atomics that do not go through kernel arguments.
    pub has_non_kernel_arg_load: bool,
    pub has_non_kernel_arg_store: bool,
    pub has_non_kernel_arg_atomic: bool,

    /// Annotations attached by the user in source.
    pub user_annotations: Vec<String>,

    // Kernel argument descriptors, kept for external introspection.
    pub arg_address_spaces: Vec<i32>,
    pub arg_access_qualifiers: Vec<String>,
    pub arg_types: Vec<String>,
    pub arg_base_types: Vec<String>,
    pub arg_type_qualifiers: Vec<String>,
    pub arg_names: Vec<String>,
}
