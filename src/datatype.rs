//! The datatype tagged union (spec §9 redesign note) replacing the
//! original's `if (class == X) ... else if (class == Y) ...` ladder over
//! `H5T_class_t`.

use crate::error::{CarveError, CarveResult};

/// Maximum nesting depth the recursive datatype walker will follow before
/// failing with [`CarveError::DatatypeTooDeep`] (spec §5).
pub const MAX_RECURSION_DEPTH: usize = 64;

/// Discriminates the two host-library object-reference ABIs (spec §4.3,
/// §9): the legacy fixed-size `hobj_ref_t` and the newer opaque
/// `H5R_ref_t`. Selected by comparing the reference datatype's runtime
/// size against the host library's reported size for each ABI.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ReferenceAbi {
    /// Legacy fixed-size object reference handle.
    Legacy,
    /// Opaque reference handle (newer host library versions).
    Opaque,
}

/// A datatype tree, mirroring HDF5's datatype class hierarchy restricted
/// to the classes the carving engine must understand.
#[derive(Debug, Clone)]
pub enum Datatype {
    /// Any class whose payload is copied verbatim: integers, floats,
    /// fixed-length strings, enums, bitfields, opaque.
    Atomic { size: usize },
    /// An object reference (handle ABI selected at copy time).
    ObjectRef { abi: ReferenceAbi },
    /// A dataset-region reference. Unsupported (spec §4.3, §9 open
    /// question 2); carried as a variant purely so it can be matched and
    /// rejected explicitly rather than falling through to `Atomic`.
    RegionRef,
    /// A record type with named, typed fields at explicit byte offsets.
    Compound { size: usize, fields: Vec<CompoundField> },
    /// A variable-length list of some element datatype.
    Vlen { element: Box<Datatype> },
    /// A fixed-rank, fixed-shape array of some element datatype.
    Array { element: Box<Datatype>, dims: Vec<usize> },
}

/// One member of a [`Datatype::Compound`], in declaration order.
#[derive(Debug, Clone)]
pub struct CompoundField {
    pub name: String,
    pub offset: usize,
    pub datatype: Datatype,
}

impl Datatype {
    /// Total element count obtained by multiplying every dimension down
    /// through nested array classes until a non-array base type is
    /// reached, together with that base type (spec §4.3 "Array class").
    pub fn array_base(&self, depth: usize) -> CarveResult<(usize, &Datatype)> {
        if depth > MAX_RECURSION_DEPTH {
            return Err(CarveError::DatatypeTooDeep);
        }
        match self {
            Datatype::Array { element, dims } => {
                let (inner_count, base) = element.array_base(depth + 1)?;
                let dim_product: usize = dims.iter().product();
                Ok((dim_product.saturating_mul(inner_count), base))
            }
            other => Ok((1, other)),
        }
    }

    /// Human-readable class name, used in `UnsupportedDatatype` messages.
    pub fn class_name(&self) -> &'static str {
        match self {
            Datatype::Atomic { .. } => "atomic",
            Datatype::ObjectRef { .. } => "object reference",
            Datatype::RegionRef => "region reference",
            Datatype::Compound { .. } => "compound",
            Datatype::Vlen { .. } => "variable-length",
            Datatype::Array { .. } => "array",
        }
    }
}
