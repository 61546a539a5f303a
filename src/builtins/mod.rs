//! Built-in primitives

pub mod basic;
pub mod combine;
pub mod permute;
pub mod scan;
pub mod segmented;
pub mod selector;

pub use basic::*;
pub use combine::{combine, combine2_by_tag, filter, pack};
pub use permute::{bpermute, bpermute_dft, mbpermute, permute, update};
pub use scan::{and, fold, fold1, scan, scan_total, sum};
pub use segmented::{
    append_s, fold1_s, fold_r, fold_s, indices_s, repeat_c, replicate_rs, replicate_s, sum_r,
    sum_s,
};
pub use selector::{count, count_s, pack_by_tag, pack_tag, pick, selector_to_indices2, tag_segd};
