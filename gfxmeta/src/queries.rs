//! Facts derived from [`FunctionMetaData`].
use crate::{
    magic::NUM_THREADS_ANNOTATION_PREFIX,
    schema::{CallableShaderType, FunctionMetaData, FunctionType},
};

/// The function is only reached through indirect dispatch: a callable shader
/// or any function with a raytracing shader type assigned.
pub fn is_bindless(md: &FunctionMetaData) -> bool {
    md.function_type == FunctionType::CallableShader
        || md.rt_info.callable_shader_type != CallableShaderType::Undefined
}

pub fn is_continuation(md: &FunctionMetaData) -> bool {
    md.rt_info.is_continuation
}

pub fn is_call_stack_handler(md: &FunctionMetaData) -> bool {
    md.rt_info.callable_shader_type == CallableShaderType::CallStackHandler
}

/// Thread count per execution unit requested through a
/// `num-thread-per-eu <N>` user annotation.
///
/// The first such annotation wins. Returns `None` when there is none, when it
/// asks for `auto`, or when its argument is not a number.
pub fn extract_annotated_num_threads(md: &FunctionMetaData) -> Option<u32> {
    let argument = md.user_annotations.iter().find_map(|annotation| {
        let rest = annotation.trim().strip_prefix(NUM_THREADS_ANNOTATION_PREFIX)?;
        // Reject longer annotation names sharing the prefix.
        if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
            return None;
        }
        Some(rest.trim())
    })?;

    if argument.eq_ignore_ascii_case("auto") {
        return None;
    }
    argument.parse().ok()
}
