//! flatseg: flat and segmented parallel array primitives
//!
//! Nested data is represented flat: one element array plus a segment
//! descriptor ([`Segd`]) giving the length and start offset of every
//! segment. All primitives are pure and run chunk-parallel on a rayon pool
//! ([`Gang`]); results are the same for any chunking.

pub mod array;
pub mod builtins;
pub mod error;
pub mod exec;
pub mod io;
pub mod random;
pub mod table;

pub use array::segd::{lengths_to_segd, mk_segd};
pub use array::{Array, Elt, Segd};
pub use error::{Error, Result};
pub use exec::{ExecConfig, Gang};
pub use io::{from_list, h_get, h_put, to_list, IOElt};
pub use random::{random_rs, randoms};
pub use table::{Column, EltType, Table};

pub use builtins::{
    and, append, append_s, bpermute, bpermute_dft, combine, combine2_by_tag, count, count_s,
    enum_from_step_len, enum_from_step_len_each, enum_from_then_to, enum_from_to,
    enum_from_to_each, extract, filter, fold, fold1, fold1_s, fold_r, fold_s, fsts, indexed,
    indices_s, mbpermute, pack, pack_by_tag, pack_tag, permute, pick, repeat, repeat_c, replicate,
    replicate_rs, replicate_s, scan, scan_total, selector_to_indices2, snds, sum, sum_r, sum_s,
    tag_segd, unzip, unzip3, update, zip, zip3, zip_with, zip_with3,
};
