//! Dynamic loading of the kernel sub-compiler.
//!
//! The sub-compiler is an optional shared library exporting two C entry
//! points: [`SUBCOMPILER_COMPILE_FN_NAME`] compiles a kernel program and
//! [`SUBCOMPILER_FREE_FN_NAME`] releases the result. When the library cannot
//! be loaded the loader stays usable but invalid, and carries a message
//! explaining why.
use std::{
    ffi::{CString, c_char, c_int},
    marker::PhantomData,
    path::Path,
    ptr::{self, NonNull},
    sync::OnceLock,
};

use libloading::Library;
use log::{debug, info, warn};

use crate::{
    magic::{SUBCOMPILER_COMPILE_FN_NAME, SUBCOMPILER_FREE_FN_NAME},
    utils::{
        conf::LoaderConfig,
        error::{MetaError, MetaResult},
    },
};

/// Compile result owned by the sub-compiler. Only ever handled by pointer.
#[repr(C)]
pub struct RawCompileInfo {
    _private: [u8; 0],
}

/// Prototype of [`SUBCOMPILER_COMPILE_FN_NAME`]: program bytes and their
/// length, NUL-terminated options, and the output slot. Returns 0 on success.
pub type CompileFn = unsafe extern "C" fn(
    *const c_char,
    usize,
    *const c_char,
    *mut *mut RawCompileInfo,
) -> c_int;

/// Prototype of [`SUBCOMPILER_FREE_FN_NAME`]. Returns 0 on success.
pub type FreeFn = unsafe extern "C" fn(*mut RawCompileInfo) -> c_int;

/// Handle on the sub-compiler library.
pub struct SubCompilerLoader {
    compile_fn: Option<CompileFn>,
    free_fn: Option<FreeFn>,
    err_msg: String,
    /// SAFETY: entry points above point into this library. It must outlive
    /// every call made through them.
    _lib: Option<Library>,
}

impl SubCompilerLoader {
    /// Load the library at `path` and resolve both entry points.
    ///
    /// Never fails: on error the loader is returned invalid with both entry
    /// points unresolved and [`SubCompilerLoader::error_message`] set.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::try_open(path) {
            Ok(loader) => {
                info!("loaded sub-compiler from {}", path.display());
                loader
            }
            Err(err_msg) => {
                warn!("sub-compiler unavailable: {err_msg}");
                Self {
                    compile_fn: None,
                    free_fn: None,
                    err_msg,
                    _lib: None,
                }
            }
        }
    }

    fn try_open(path: &Path) -> Result<Self, String> {
        unsafe {
            let library = Library::new(path)
                .map_err(|e| format!("cannot load '{}': {e}", path.display()))?;

            let compile_fn: CompileFn = *library
                .get::<CompileFn>(SUBCOMPILER_COMPILE_FN_NAME.as_bytes())
                .map_err(|e| {
                    format!(
                        "'{}' does not export {SUBCOMPILER_COMPILE_FN_NAME}: {e}",
                        path.display()
                    )
                })?;

            let free_fn: FreeFn = *library
                .get::<FreeFn>(SUBCOMPILER_FREE_FN_NAME.as_bytes())
                .map_err(|e| {
                    format!(
                        "'{}' does not export {SUBCOMPILER_FREE_FN_NAME}: {e}",
                        path.display()
                    )
                })?;

            Ok(Self {
                compile_fn: Some(compile_fn),
                free_fn: Some(free_fn),
                err_msg: String::new(),
                _lib: Some(library),
            })
        }
    }

    /// The process-wide loader, opened on first use from
    /// [`LoaderConfig::resolve`].
    pub fn global() -> &'static SubCompilerLoader {
        static LOADER: OnceLock<SubCompilerLoader> = OnceLock::new();
        LOADER.get_or_init(|| {
            let config = LoaderConfig::resolve();
            debug!(
                "opening sub-compiler from {}",
                config.library_path.display()
            );
            SubCompilerLoader::open(&config.library_path)
        })
    }

    /// Both entry points were resolved.
    pub fn is_valid(&self) -> bool {
        self.compile_fn.is_some() && self.free_fn.is_some()
    }

    /// Why the loader is invalid. Empty for a valid loader.
    pub fn error_message(&self) -> &str {
        &self.err_msg
    }

    pub fn compile_fn(&self) -> Option<CompileFn> {
        self.compile_fn
    }

    pub fn free_fn(&self) -> Option<FreeFn> {
        self.free_fn
    }

    /// Compile `program` with the given option string.
    ///
    /// The returned handle releases the result through the library when
    /// dropped.
    pub fn compile(&self, program: &[u8], options: &str) -> MetaResult<CompileOutput<'_>> {
        let (Some(compile_fn), Some(free_fn)) = (self.compile_fn, self.free_fn) else {
            return Err(MetaError::SubCompilerUnavailable(self.err_msg.clone()));
        };
        let options = CString::new(options).map_err(|_| MetaError::InvalidCompileOptions)?;

        let mut output: *mut RawCompileInfo = ptr::null_mut();
        let status = unsafe {
            compile_fn(
                program.as_ptr().cast::<c_char>(),
                program.len(),
                options.as_ptr(),
                &mut output,
            )
        };

        let info = NonNull::new(output);
        if status != 0 {
            if let Some(info) = info {
                unsafe { free_fn(info.as_ptr()) };
            }
            return Err(MetaError::SubCompilerFailed { status });
        }

        let info = info.ok_or(MetaError::MissingCompileResult)?;
        debug!("sub-compiler compiled {} bytes", program.len());
        Ok(CompileOutput {
            info,
            free_fn,
            _loader: PhantomData,
        })
    }
}

/// A compile result, released through the sub-compiler when dropped.
pub struct CompileOutput<'a> {
    info: NonNull<RawCompileInfo>,
    free_fn: FreeFn,
    _loader: PhantomData<&'a SubCompilerLoader>,
}

impl CompileOutput<'_> {
    /// The raw result, valid for the lifetime of this handle.
    pub fn as_ptr(&self) -> *const RawCompileInfo {
        self.info.as_ptr()
    }
}

impl Drop for CompileOutput<'_> {
    fn drop(&mut self) {
        let status = unsafe { (self.free_fn)(self.info.as_ptr()) };
        if status != 0 {
            warn!("sub-compiler failed to release a compile result (status {status})");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_library_leaves_loader_invalid() {
        let loader = SubCompilerLoader::open("/nonexistent/libcmc-missing.so");
        assert!(!loader.is_valid());
        assert!(!loader.error_message().is_empty());
        assert!(loader.compile_fn().is_none());
        assert!(loader.free_fn().is_none());
    }
}
