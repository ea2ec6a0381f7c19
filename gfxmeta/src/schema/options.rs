//! Module-wide compile options.
//!
//! Every option the pipeline recognizes lives in [`CompOptions`]. Options are
//! fixed once compilation begins; passes only read them.
use serde::{Deserialize, Serialize};
use strum::{EnumIs, FromRepr};

use crate::utils::error::{MetaError, MetaResult};

/// Floating-point rounding mode.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, EnumIs, FromRepr, Serialize, Deserialize,
)]
#[repr(u32)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    #[default]
    NearestEven = 0,
    TowardPositive = 1,
    TowardNegative = 2,
    Zero = 3,
    /// Any rounding is acceptable.
    Any = 4,
}

/// Compiler behaviour switches for one compilation unit.
///
/// Missing keys take their default when read from TOML, so a document only
/// needs to list the options it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompOptions {
    /// Flush denormal floats to zero.
    pub denorms_are_zero: bool,
    /// Division and square root must be correctly rounded.
    pub correctly_rounded_div_sqrt: bool,
    /// Disable optimizations.
    pub opt_disable: bool,
    /// Allow `a * b + c` to be fused into a mad.
    pub mad_enable: bool,
    /// Sign of zero may be ignored.
    pub no_signed_zeros: bool,
    /// NaNs may be assumed absent.
    pub no_nans: bool,
    /// Default rounding mode of float arithmetic.
    pub float_rounding_mode: RoundingMode,
    /// Default rounding mode of float to integer conversions.
    pub float_cvt_int_rounding_mode: RoundingMode,
    /// Register pressure threshold of the pre-scheduler, 0 for the default.
    pub visa_pre_sched_rp_threshold: u32,
    /// Loop unroll threshold, 0 for the default.
    pub set_loop_unroll_threshold: u32,
    /// Allow value-changing math transformations.
    pub unsafe_math_optimizations: bool,
    /// Arguments and results are neither NaN nor infinite.
    pub finite_math_only: bool,
    /// Relaxed precision math builtins.
    pub fast_relaxed_math: bool,
    /// Debug information was requested.
    pub dash_g_specified: bool,
    /// Favor compile time over code quality.
    pub fast_compilation: bool,
    /// Place private memory in scratch space.
    pub use_scratch_space_private_memory: bool,
    /// Builtins may use relaxed implementations.
    pub relaxed_builtins: bool,
    /// Sub-groups must make independent forward progress.
    pub subgroup_independent_forward_progress_required: bool,
    /// Buffers larger than 2GB must be supported.
    pub greater_than_2gb_buffer_required: bool,
    /// Buffers larger than 4GB must be supported.
    pub greater_than_4gb_buffer_required: bool,
    /// Disable the 64-bit addressing workaround.
    pub disable_a64_wa: bool,
    /// Force the 64-bit addressing workaround.
    pub force_enable_a64_wa: bool,
    /// Allow constants to be promoted into push registers.
    pub push_constants_enable: bool,
    /// Pointer offsets are known to be positive.
    pub has_positive_pointer_offset: bool,
    /// Kernels receive a buffer offset argument.
    pub has_buffer_offset_arg: bool,
    /// The buffer offset argument may be omitted.
    pub buffer_offset_arg_optional: bool,
    /// Some pointer arguments are aligned below a dword.
    pub has_sub_dw_aligned_ptr_arg: bool,
    /// Treat the global work offset as zero.
    pub replace_global_offsets_by_zero: bool,
    /// Force a SIMD width for pixel shaders, 0 to let heuristics decide.
    pub force_pixel_shader_simd_mode: u32,
    /// Keep a pixel shader compilation that spills.
    pub pixel_shader_do_not_abort_on_spill: bool,
    /// Work-groups are uniformly sized.
    pub uniform_wgs: bool,
    /// Disable vertex component packing.
    pub disable_vertex_component_packing: bool,
    /// Disable partial vertex component packing.
    pub disable_partial_vertex_component_packing: bool,
    /// Prefer bindless access for images.
    pub prefer_bindless_images: bool,
    /// Use bindless addressing for resources.
    pub use_bindless_mode: bool,
    /// Use the legacy bindless addressing scheme.
    pub use_legacy_bindless_mode: bool,
    /// Disable algebraic refactoring of math expressions.
    pub disable_math_refactoring: bool,
    /// Enable the atomic branch optimization.
    pub atomic_branch: bool,
    /// Use the minimal SIMD size when searching the fastest compute variant.
    pub force_min_simd_size_for_fastest_cs: bool,
    /// Use linear scan register allocation in fastest mode.
    pub enable_fastest_linear_scan: bool,
    /// Use stateless memory for private data too large for scratch space.
    pub use_stateless_for_private_memory: bool,
    /// Allow taking the address of program-scope globals.
    pub enable_take_global_address: bool,
    /// The unit is a library, not an executable program.
    pub is_library_compilation: bool,
    /// Fast finalizer compilation.
    pub fast_visa_compile: bool,
    /// Match `sin(pi * x)` / `cos(pi * x)` patterns.
    pub match_sin_cos_pi: bool,
    /// Collect compiler statistics.
    pub capture_compiler_stats: bool,
    /// Prefer the ZE binary format. The legacy format may still be used when the
    /// input needs features ZE binaries lack.
    pub enable_ze_binary: bool,
    /// Omit the IR from ZE binaries.
    pub exclude_ir_from_ze_binary: bool,
    /// Allow rematerialization to be disabled for compute shaders.
    pub allow_disable_remat_for_cs: bool,
    /// Do not raise spill cost of address-taken values.
    pub disable_inc_spill_cost_all_addr_taken: bool,
    /// Disable the coarse pixel shading omask workaround.
    pub disable_cpso_mask_wa: bool,
    /// Force half-precision promotion workaround.
    pub wa_force_half_promotion: bool,
}

impl Default for CompOptions {
    fn default() -> Self {
        Self {
            denorms_are_zero: false,
            correctly_rounded_div_sqrt: false,
            opt_disable: false,
            mad_enable: false,
            no_signed_zeros: false,
            no_nans: false,
            float_rounding_mode: RoundingMode::NearestEven,
            float_cvt_int_rounding_mode: RoundingMode::Zero,
            visa_pre_sched_rp_threshold: 0,
            set_loop_unroll_threshold: 0,
            unsafe_math_optimizations: false,
            finite_math_only: false,
            fast_relaxed_math: false,
            dash_g_specified: false,
            fast_compilation: false,
            use_scratch_space_private_memory: true,
            relaxed_builtins: false,
            subgroup_independent_forward_progress_required: true,
            greater_than_2gb_buffer_required: true,
            greater_than_4gb_buffer_required: true,
            disable_a64_wa: false,
            force_enable_a64_wa: false,
            push_constants_enable: true,
            has_positive_pointer_offset: false,
            has_buffer_offset_arg: false,
            buffer_offset_arg_optional: true,
            has_sub_dw_aligned_ptr_arg: false,
            replace_global_offsets_by_zero: false,
            force_pixel_shader_simd_mode: 0,
            pixel_shader_do_not_abort_on_spill: false,
            uniform_wgs: false,
            disable_vertex_component_packing: false,
            disable_partial_vertex_component_packing: false,
            prefer_bindless_images: false,
            use_bindless_mode: false,
            use_legacy_bindless_mode: true,
            disable_math_refactoring: false,
            atomic_branch: false,
            force_min_simd_size_for_fastest_cs: false,
            enable_fastest_linear_scan: false,
            use_stateless_for_private_memory: false,
            enable_take_global_address: false,
            is_library_compilation: false,
            fast_visa_compile: false,
            match_sin_cos_pi: false,
            capture_compiler_stats: false,
            enable_ze_binary: false,
            exclude_ir_from_ze_binary: false,
            allow_disable_remat_for_cs: false,
            disable_inc_spill_cost_all_addr_taken: false,
            disable_cpso_mask_wa: false,
            wa_force_half_promotion: false,
        }
    }
}

impl CompOptions {
    /// Parse options from a TOML document. Absent keys keep their default.
    pub fn from_toml_str(toml_str: &str) -> MetaResult<Self> {
        toml::from_str(toml_str).map_err(MetaError::CompOptionsParseError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_overrides_only_listed_options() {
        let options = CompOptions::from_toml_str(
            r#"
            fast_relaxed_math = true
            push_constants_enable = false
            float_rounding_mode = "toward_negative"
            "#,
        )
        .unwrap();

        assert!(options.fast_relaxed_math);
        assert!(!options.push_constants_enable);
        assert_eq!(options.float_rounding_mode, RoundingMode::TowardNegative);
        assert_eq!(options.float_cvt_int_rounding_mode, RoundingMode::Zero);
        assert!(options.use_legacy_bindless_mode);
    }

    #[test]
    fn empty_document_yields_defaults() {
        assert_eq!(CompOptions::from_toml_str("").unwrap(), CompOptions::default());
    }

    #[test]
    fn unknown_rounding_mode_is_rejected() {
        assert!(CompOptions::from_toml_str(r#"float_rounding_mode = "sideways""#).is_err());
    }
}
