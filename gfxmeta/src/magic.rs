/// Number of simple-push slots. The push array is fixed to this length.
pub const MAX_PUSHED_BUFFERS: usize = 4;

/// Sentinel for "index not yet assigned".
pub const UNASSIGNED_INDEX: u32 = u32::MAX;

/// Number of input resource slots tracked by the shader resource view masks.
pub const INPUT_RESOURCE_SLOT_COUNT: usize = 128;

/// Number of 64-bit words in a shader resource view mask.
pub const NUM_SHADER_RESOURCE_VIEW_SIZE: usize = (INPUT_RESOURCE_SLOT_COUNT + 1) / 64;

/// Index used for indirect accesses when they do not need to be told apart.
pub const DEFAULT_INDIRECT_IDX: u32 = 0;

/// User annotation prefix requesting a thread count per execution unit.
pub const NUM_THREADS_ANNOTATION_PREFIX: &str = "num-thread-per-eu";

/// Name of the sub-compiler entry point compiling a kernel program.
pub const SUBCOMPILER_COMPILE_FN_NAME: &str = "cmc_load_and_compile";

/// Name of the sub-compiler entry point releasing a compile result.
pub const SUBCOMPILER_FREE_FN_NAME: &str = "cmc_free_compile_info";

/// Name of the environment variable pointing at the sub-compiler library. If not
/// set, [`SUBCOMPILER_CONFIG_FILE`] is looked up in the configuration directory:
///  (1) on Linux and macOS: `$XDG_CONFIG_HOME/gfxmeta/` or `$HOME/.config/gfxmeta/`
///  (2) on Windows: `%APPDATA%\gfxmeta\`
pub const ENV_SUBCOMPILER_PATH: &str = "GFXMETA_SUBCOMPILER_PATH";

/// Name of the loader configuration file.
pub const SUBCOMPILER_CONFIG_FILE: &str = "subcompiler.toml";

/// Library name used when nothing else is configured.
#[cfg(target_os = "windows")]
pub const DEFAULT_SUBCOMPILER_LIBRARY: &str = "cmc.dll";
#[cfg(target_os = "macos")]
pub const DEFAULT_SUBCOMPILER_LIBRARY: &str = "libcmc.dylib";
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
pub const DEFAULT_SUBCOMPILER_LIBRARY: &str = "libcmc.so";
