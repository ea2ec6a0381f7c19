//! Push constants: constant-buffer regions promoted to per-thread registers.
use std::collections::BTreeMap;

use log::trace;

use crate::{
    magic::{MAX_PUSHED_BUFFERS, UNASSIGNED_INDEX},
    utils::error::{MetaError, MetaResult},
};

/// Location of a pushed constant.
///
/// Ordered by buffer, then element, then size. Code generation assigns
/// physical locations in this order, so it must stay deterministic.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConstantAddress {
    pub buf_id: u32,
    pub elt_id: u32,
    pub size: u32,
}

impl ConstantAddress {
    pub fn new(buf_id: u32, elt_id: u32, size: u32) -> Self {
        Self {
            buf_id,
            elt_id,
            size,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SInputDesc {
    pub index: u32,
    pub arg_index: i32,
    pub interpolation_mode: i32,
}

/// A promoted constant-buffer region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimplePushInfo {
    pub cb_idx: u32,
    pub pushable_address_grf_offset: i32,
    pub pushable_offset_grf_offset: i32,
    /// Byte offset of the region within the buffer.
    pub offset: u32,
    /// Byte size of the region.
    pub size: u32,
    pub is_stateless: bool,
    pub is_bindless: bool,
    /// Byte offset within the region to argument index.
    pub simple_push_loads: BTreeMap<u32, i32>,
}

impl Default for SimplePushInfo {
    fn default() -> Self {
        Self {
            cb_idx: 0,
            pushable_address_grf_offset: -1,
            pushable_offset_grf_offset: -1,
            offset: 0,
            size: 0,
            is_stateless: false,
            is_bindless: false,
            simple_push_loads: BTreeMap::new(),
        }
    }
}

impl SimplePushInfo {
    /// One past the last pushed byte.
    pub fn end(&self) -> u64 {
        self.offset as u64 + self.size as u64
    }

    fn overlaps(&self, other: &SimplePushInfo) -> bool {
        self.cb_idx == other.cb_idx
            && self.is_stateless == other.is_stateless
            && (self.offset as u64) < other.end()
            && (other.offset as u64) < self.end()
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatelessPushInfo {
    pub address_offset: u32,
    pub is_static: bool,
}

/// Dynamic buffer offsets occupy the runtime values
/// `[first_index, first_index + num_offsets)` when `num_offsets > 0`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DynamicBufferInfo {
    pub first_index: u32,
    pub num_offsets: u32,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArgDependencyInfoMD {
    pub arg_dependency: i32,
}

/// Everything promoted into push registers.
///
/// Values map to argument numbers so the corresponding function argument can
/// be retrieved later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushInfo {
    pub pushable_addresses: Vec<StatelessPushInfo>,
    /// Runtime values used with the descriptor table offset to compute surface
    /// state offsets for bindless pushes.
    pub bindless_push_info: Vec<u32>,
    pub dynamic_buffer_info: DynamicBufferInfo,
    /// Number of buffers the simple push mechanism may use for this shader.
    pub max_number_of_pushed_buffers: u32,
    pub inline_constant_buffer_slot: u32,
    pub inline_constant_buffer_offset: u32,
    pub inline_constant_buffer_grf_offset: u32,
    pub constants: BTreeMap<ConstantAddress, i32>,
    pub inputs: BTreeMap<u32, SInputDesc>,
    pub constant_reg: BTreeMap<u32, i32>,
    pub simple_push_info_arr: [SimplePushInfo; MAX_PUSHED_BUFFERS],
    pub simple_push_buffer_used: u32,
    pub push_analysis_wi_infos: Vec<ArgDependencyInfoMD>,
    /// Offset of the raytracing globals pointer, pushed for non-raytracing
    /// shaders issuing ray queries.
    pub inline_rt_global_ptr_offset: u32,
    pub rt_sync_surf_ptr_offset: u32,
}

impl Default for PushInfo {
    fn default() -> Self {
        Self {
            pushable_addresses: Vec::new(),
            bindless_push_info: Vec::new(),
            dynamic_buffer_info: DynamicBufferInfo::default(),
            max_number_of_pushed_buffers: 0,
            inline_constant_buffer_slot: UNASSIGNED_INDEX,
            inline_constant_buffer_offset: UNASSIGNED_INDEX,
            inline_constant_buffer_grf_offset: UNASSIGNED_INDEX,
            constants: BTreeMap::new(),
            inputs: BTreeMap::new(),
            constant_reg: BTreeMap::new(),
            simple_push_info_arr: Default::default(),
            simple_push_buffer_used: 0,
            push_analysis_wi_infos: Vec::new(),
            inline_rt_global_ptr_offset: 0,
            rt_sync_surf_ptr_offset: 0,
        }
    }
}

impl PushInfo {
    /// Number of simple-push slots this shader may use.
    pub fn simple_push_limit(&self) -> usize {
        (self.max_number_of_pushed_buffers as usize).min(MAX_PUSHED_BUFFERS)
    }

    /// Slots currently in use.
    pub fn simple_push_slots(&self) -> &[SimplePushInfo] {
        let used = (self.simple_push_buffer_used as usize).min(MAX_PUSHED_BUFFERS);
        &self.simple_push_info_arr[..used]
    }

    /// Place `slot` in the next free simple-push slot and return its index.
    ///
    /// Fails when the configured maximum is reached or when the slot's byte
    /// range overlaps a slot already pushed from the same buffer.
    pub fn push_simple_slot(&mut self, slot: SimplePushInfo) -> MetaResult<usize> {
        let index = self.simple_push_buffer_used as usize;
        let max = self.simple_push_limit();
        if index >= max {
            return Err(MetaError::PushSlotsExhausted {
                cb_idx: slot.cb_idx,
                max,
            });
        }

        if let Some(existing) = self
            .simple_push_slots()
            .iter()
            .position(|existing| existing.overlaps(&slot))
        {
            return Err(MetaError::OverlappingPushSlot {
                cb_idx: slot.cb_idx,
                offset: slot.offset,
                end: slot.end(),
                slot: existing,
            });
        }

        trace!(
            "pushing buffer {} [{}, {}) into slot {index}",
            slot.cb_idx,
            slot.offset,
            slot.end()
        );
        self.simple_push_info_arr[index] = slot;
        self.simple_push_buffer_used += 1;
        Ok(index)
    }
}
