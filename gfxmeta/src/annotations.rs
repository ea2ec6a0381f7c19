//! Kernel argument annotations consumed when packaging kernels for the
//! runtime.
//!
//! Argument indices are taken as given: the builder neither checks them
//! against the kernel signature nor refuses duplicates. Annotating an index a
//! second time replaces the earlier record.
use std::{collections::BTreeMap, ops::Range};

use log::{trace, warn};
use strum::{EnumIs, FromRepr};

/// Dimensionality of an image argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIs, FromRepr)]
#[repr(u32)]
pub enum ImageDim {
    D1 = 1,
    D2 = 2,
    D3 = 3,
}

/// How the runtime must set up one kernel argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIs)]
pub enum ArgAnnotation {
    /// Scalar copied into the payload.
    Constant {
        size_in_bytes: u32,
        payload_position: u32,
    },
    /// Surface bound at `bti`.
    Image {
        bti: u32,
        payload_position: u32,
        dim: ImageDim,
        writeable: bool,
    },
    /// Global memory pointer, optionally backed by a binding table entry.
    PointerGlobal {
        byte_size: u32,
        payload_position: u32,
        bti: Option<u32>,
    },
    /// The argument's buffer is accessed statefully.
    BufferStateful,
    Sampler {
        payload_position: u32,
    },
}

/// Binding table layout of a kernel.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct BtLayout {
    /// Writable resources.
    pub uavs: Range<u32>,
    /// Read-only resources, starting right after the last UAV.
    pub resources: Range<u32>,
}

impl BtLayout {
    /// Number of binding table entries in use.
    pub fn len(&self) -> u32 {
        self.resources.end
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Builder collecting the annotations of one kernel.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct KernelAnnotations {
    args: BTreeMap<u32, ArgAnnotation>,
    local_size_payload_position: Option<u32>,
    implicit_args_payload_position: Option<u32>,
    bt_layout: BtLayout,
}

impl KernelAnnotations {
    pub fn new() -> Self {
        Self::default()
    }

    fn annotate(&mut self, arg_no: u32, annotation: ArgAnnotation) {
        trace!("argument {arg_no}: {annotation:?}");
        if let Some(previous) = self.args.insert(arg_no, annotation) {
            warn!("argument {arg_no} annotated twice, replacing {previous:?}");
        }
    }

    pub fn annotate_constant(&mut self, arg_no: u32, size_in_bytes: u32, payload_position: u32) {
        self.annotate(
            arg_no,
            ArgAnnotation::Constant {
                size_in_bytes,
                payload_position,
            },
        );
    }

    pub fn annotate_image(
        &mut self,
        arg_no: u32,
        bti: u32,
        payload_position: u32,
        dim: ImageDim,
        writeable: bool,
    ) {
        self.annotate(
            arg_no,
            ArgAnnotation::Image {
                bti,
                payload_position,
                dim,
                writeable,
            },
        );
    }

    pub fn annotate_pointer_global(
        &mut self,
        arg_no: u32,
        byte_size: u32,
        payload_position: u32,
        bti: Option<u32>,
    ) {
        self.annotate(
            arg_no,
            ArgAnnotation::PointerGlobal {
                byte_size,
                payload_position,
                bti,
            },
        );
    }

    pub fn annotate_buffer_stateful(&mut self, arg_no: u32) {
        self.annotate(arg_no, ArgAnnotation::BufferStateful);
    }

    pub fn annotate_sampler(&mut self, arg_no: u32, payload_position: u32) {
        self.annotate(arg_no, ArgAnnotation::Sampler { payload_position });
    }

    /// Payload offset of the local size vector.
    pub fn set_local_size(&mut self, payload_position: u32) {
        self.local_size_payload_position = Some(payload_position);
    }

    /// Payload offset of the implicit dispatch arguments (global work offset
    /// and local work size).
    pub fn set_implicit_arguments(&mut self, payload_position: u32) {
        self.implicit_args_payload_position = Some(payload_position);
    }

    pub fn arg(&self, arg_no: u32) -> Option<&ArgAnnotation> {
        self.args.get(&arg_no)
    }

    /// Annotations by increasing argument index.
    pub fn args(&self) -> impl Iterator<Item = (u32, &ArgAnnotation)> {
        self.args.iter().map(|(arg_no, annotation)| (*arg_no, annotation))
    }

    pub fn local_size(&self) -> Option<u32> {
        self.local_size_payload_position
    }

    pub fn implicit_arguments(&self) -> Option<u32> {
        self.implicit_args_payload_position
    }

    pub fn bt_layout(&self) -> &BtLayout {
        &self.bt_layout
    }

    /// Lay out the binding table for `num_uavs` writable and `num_resources`
    /// read-only resources.
    ///
    /// Indices saturate at `u32::MAX`, truncating the read-only range.
    pub fn recompute_bt_layout(&mut self, num_uavs: u32, num_resources: u32) -> &BtLayout {
        let resources_end = num_uavs.saturating_add(num_resources);
        if resources_end - num_uavs < num_resources {
            warn!(
                "binding table of {num_uavs} UAVs and {num_resources} resources exceeds u32 indices"
            );
        }
        self.bt_layout = BtLayout {
            uavs: 0..num_uavs,
            resources: num_uavs..resources_end,
        };
        trace!("binding table layout: {:?}", self.bt_layout);
        &self.bt_layout
    }
}
