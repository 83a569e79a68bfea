//! The host data library's capability interface (spec §6), expressed as a
//! Rust trait. Generalizes the teacher's `vfs::Vfs` trait (one method per
//! RFC 1813 procedure) to the HDF5 object-model primitives the carving
//! core needs: open/create/copy/iterate over groups, datasets, and
//! attributes, plus datatype introspection and reference
//! dereferencing/creation.
//!
//! Every method is synchronous (spec §5: "the core runs on the threads of
//! the host application, synchronously on each intercepted call... no
//! asynchronous work") — a `dlsym(RTLD_NEXT, ...)`-interposed call into a
//! real HDF5 binding is an ordinary blocking FFI call, with no runtime to
//! drive an `async fn` against.
//!
//! A production build of this crate would implement `HostLibrary` against
//! an HDF5 FFI binding; the carving core itself never speaks to HDF5
//! directly, which is what lets `tests/support/mock_library.rs` stand in
//! for it in tests.

use crate::datatype::Datatype;
use crate::error::CarveResult;
use crate::model::ObjectPath;

/// Opaque handle to an open file.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct FileHandle(pub u64);

/// Opaque handle to an open group, dataset, or named datatype.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ObjectHandle(pub u64);

/// Flags an `open_file` call is made with (mirrors `H5Fopen`'s `flags`).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OpenFlags {
    ReadOnly,
    ReadWrite,
}

/// The kind of object an `ObjectHandle` names (spec §6 "type (group /
/// dataset / named-type / bad)").
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ObjectKind {
    Group,
    Dataset,
    NamedType,
    Bad,
}

/// A dataspace: the shape datasets and attributes are stored with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataspace {
    /// Extent along each dimension. Empty means scalar (one element).
    pub dims: Vec<u64>,
}

impl Dataspace {
    pub fn scalar() -> Self {
        Dataspace { dims: Vec::new() }
    }

    pub fn new(dims: Vec<u64>) -> Self {
        Dataspace { dims }
    }

    /// Total element count represented by this dataspace.
    pub fn element_count(&self) -> u64 {
        if self.dims.is_empty() {
            1
        } else {
            self.dims.iter().product()
        }
    }
}

/// Opaque dataset creation property list, copied bit-for-bit from source
/// to destination; the carving core never interprets its contents.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CreationProperties(pub Vec<u8>);

/// A typed attribute payload. Structured by datatype class rather than a
/// single flat byte buffer with manual offset arithmetic (spec §9's
/// "manual buffer arithmetic for compound member offsets" redesign note):
/// each variant already carries the shape the recursive copier in
/// `attributes.rs` needs, in place of a `(base_offset, element_stride)`
/// stack walking a `void*`.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    /// Raw payload for `dataspace.element_count()` atomic elements.
    Atomic(Vec<u8>),
    /// One resolved target path per referenced element. Empty for a
    /// zero-element reference attribute (spec §4.3 edge case).
    ObjectRef(Vec<ObjectPath>),
    /// `dataspace.element_count()` compound records, each an ordered list
    /// of (field name, value) matching the compound datatype's field
    /// declaration order.
    Compound(Vec<Vec<(String, AttributeValue)>>),
    /// `dataspace.element_count()` variable-length lists of element
    /// values.
    Vlen(Vec<Vec<AttributeValue>>),
    /// A single array-typed element, flattened to
    /// `Datatype::array_base`'s total element count of base-type values.
    Array(Vec<AttributeValue>),
}

/// A full attribute: datatype, dataspace, and payload.
#[derive(Debug, Clone)]
pub struct Attribute {
    pub datatype: Datatype,
    pub dataspace: Dataspace,
    pub value: AttributeValue,
}

/// The host library capability interface (spec §6). Every method is a
/// plain blocking call — see the module doc comment for why this trait
/// carries no `async`.
pub trait HostLibrary: Send + Sync {
    /// Opens a file for read or read-write access.
    fn open_file(&self, path: &str, flags: OpenFlags) -> CarveResult<FileHandle>;

    /// Creates a new file, truncating any existing contents (`H5Fcreate`
    /// with `H5F_ACC_TRUNC`).
    fn create_file(&self, path: &str) -> CarveResult<FileHandle>;

    /// Closes a file handle.
    fn close_file(&self, file: FileHandle) -> CarveResult<()>;

    /// Whether a file already exists on durable storage, without opening
    /// it (`access(path, F_OK)`).
    fn file_exists(&self, path: &str) -> bool;

    /// Opens the root group (`/`) of a file.
    fn root_group(&self, file: FileHandle) -> CarveResult<ObjectHandle>;

    /// Resolves an absolute path to an object handle within a file.
    fn open_object_by_path(&self, file: FileHandle, path: &ObjectPath) -> CarveResult<ObjectHandle>;

    /// The kind of object a handle names.
    fn object_kind(&self, object: ObjectHandle) -> CarveResult<ObjectKind>;

    /// The object's absolute path within its file.
    fn object_path(&self, object: ObjectHandle) -> CarveResult<ObjectPath>;

    /// Creates a group with the given name under `parent`.
    fn create_group(&self, file: FileHandle, parent: ObjectHandle, name: &str) -> CarveResult<ObjectHandle>;

    /// The datatype of a dataset.
    fn dataset_datatype(&self, dataset: ObjectHandle) -> CarveResult<Datatype>;

    /// The dataspace of a dataset.
    fn dataset_dataspace(&self, dataset: ObjectHandle) -> CarveResult<Dataspace>;

    /// The dataset creation property list of a dataset, as an opaque blob.
    fn dataset_creation_properties(&self, dataset: ObjectHandle) -> CarveResult<CreationProperties>;

    /// Creates a dataset shell: identical datatype, dataspace, and creation
    /// properties to the source, with no payload.
    fn create_dataset(
        &self,
        file: FileHandle,
        parent: ObjectHandle,
        name: &str,
        datatype: &Datatype,
        dataspace: &Dataspace,
        creation_properties: &CreationProperties,
    ) -> CarveResult<ObjectHandle>;

    /// Deletes a link (and, if it was the last link, the object it named).
    fn delete_link(&self, file: FileHandle, parent: ObjectHandle, name: &str) -> CarveResult<()>;

    /// Deletes an attribute by name.
    fn delete_attribute(&self, object: ObjectHandle, name: &str) -> CarveResult<()>;

    /// Full recursive payload copy of one object from `src_path` in
    /// `src_file` to `dst_path` in `dst_file` (`H5Ocopy`).
    fn copy_object(
        &self,
        src_file: FileHandle,
        src_path: &ObjectPath,
        dst_file: FileHandle,
        dst_path: &ObjectPath,
    ) -> CarveResult<()>;

    /// Child link names directly under `group`, name-ascending (spec §4.2
    /// traversal order guarantee).
    fn list_links(&self, group: ObjectHandle) -> CarveResult<Vec<String>>;

    /// Attribute names on `object`, name-ascending (spec §4.3 ordering
    /// guarantee).
    fn list_attributes(&self, object: ObjectHandle) -> CarveResult<Vec<String>>;

    /// Reads one attribute's full value.
    fn read_attribute(&self, object: ObjectHandle, name: &str) -> CarveResult<Attribute>;

    /// Creates (or, if already present, overwrites) an attribute.
    ///
    /// For an [`AttributeValue::ObjectRef`] payload, every target path
    /// MUST already exist in `file` (spec §4.3: this is why attribute copy
    /// is deferred to termination) — callers check with
    /// [`HostLibrary::object_exists`] first so they can report
    /// [`crate::error::CarveError::DanglingReference`] rather than letting
    /// the host library fail opaquely.
    fn write_attribute(&self, object: ObjectHandle, name: &str, attribute: &Attribute) -> CarveResult<()>;

    /// Whether an object exists at `path` within `file`.
    fn object_exists(&self, file: FileHandle, path: &ObjectPath) -> bool;
}
