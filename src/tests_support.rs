//! Shared in-memory [`HostLibrary`] double for unit tests in `skeleton.rs`,
//! `tracker.rs`, `router.rs`, and `lifecycle.rs`, grounded on the teacher's
//! `tests/shadow_fs/common.rs` harness style: a small fake backing store
//! driven through the same trait the production code uses, rather than
//! mocking individual calls.
//!
//! `tests/support/mock_library.rs` is a separate, independent double for
//! the crate's black-box integration tests — this one is only reachable
//! from `#[cfg(test)]` modules compiled into the library itself.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::capability::{
    Attribute, CreationProperties, Dataspace, FileHandle, HostLibrary, ObjectHandle, ObjectKind, OpenFlags,
};
use crate::datatype::Datatype;
use crate::error::{CarveError, CarveResult};
use crate::model::ObjectPath;

#[derive(Debug, Clone)]
enum ObjectData {
    Group { children: Vec<String> },
    Dataset { datatype: Datatype, dataspace: Dataspace, props: CreationProperties, payload: Option<Vec<u8>> },
}

#[derive(Debug, Clone, Default)]
struct ObjectRecord {
    data: Option<ObjectData>,
    attributes: Vec<(String, Attribute)>,
}

#[derive(Debug, Default)]
struct FileState {
    objects: HashMap<String, ObjectRecord>,
}

#[derive(Default)]
struct Inner {
    next_handle: u64,
    next_file: u64,
    files: HashMap<u64, FileState>,
    paths: HashMap<String, u64>,
    handle_index: HashMap<u64, (u64, String)>,
}

/// An in-memory stand-in for the host data library, sufficient to exercise
/// the carving engine's control flow without a real HDF5 binding.
#[derive(Default)]
pub struct InMemoryHost {
    inner: Mutex<Inner>,
}

impl InMemoryHost {
    pub fn new() -> Self {
        InMemoryHost::default()
    }

    fn alloc_handle(inner: &mut Inner, file: u64, path: String) -> u64 {
        inner.next_handle += 1;
        let handle = inner.next_handle;
        inner.handle_index.insert(handle, (file, path));
        handle
    }

    fn record<'a>(inner: &'a mut Inner, file: u64, path: &str) -> &'a mut ObjectRecord {
        inner.files.get_mut(&file).unwrap().objects.entry(path.to_owned()).or_default()
    }

    /// Creates a fresh file with just a root group, no seed data.
    pub fn create_destination(&self) -> FileHandle {
        let mut inner = self.inner.lock().unwrap();
        inner.next_file += 1;
        let file = inner.next_file;
        let mut state = FileState::default();
        state.objects.insert("/".to_owned(), ObjectRecord { data: Some(ObjectData::Group { children: Vec::new() }), attributes: Vec::new() });
        inner.files.insert(file, state);
        FileHandle(file)
    }

    /// Seeds a source file matching scenario S1: groups `/g1`, `/g2`,
    /// dataset `/g1/a` (int32 `[1,2,3,4]`), dataset `/g1/b` (float32
    /// `[0.5,-0.5]`).
    pub fn seed_source_tree(&self) -> FileHandle {
        let file = self.create_destination();
        let mut inner = self.inner.lock().unwrap();
        let f = file.0;

        for (parent, name) in [("/", "g1"), ("/", "g2")] {
            let path = format!("{}{}{}", parent, if parent == "/" { "" } else { "/" }, name);
            Self::record(&mut inner, f, &path).data = Some(ObjectData::Group { children: Vec::new() });
            if let Some(ObjectData::Group { children }) = &mut Self::record(&mut inner, f, parent).data {
                children.push(name.to_owned());
            }
        }

        let a_payload: Vec<u8> = [1i32, 2, 3, 4].iter().flat_map(|v| v.to_le_bytes()).collect();
        Self::record(&mut inner, f, "/g1/a").data = Some(ObjectData::Dataset {
            datatype: Datatype::Atomic { size: 4 },
            dataspace: Dataspace::new(vec![4]),
            props: CreationProperties::default(),
            payload: Some(a_payload),
        });
        let b_payload: Vec<u8> = [0.5f32, -0.5].iter().flat_map(|v| v.to_le_bytes()).collect();
        Self::record(&mut inner, f, "/g1/b").data = Some(ObjectData::Dataset {
            datatype: Datatype::Atomic { size: 4 },
            dataspace: Dataspace::new(vec![2]),
            props: CreationProperties::default(),
            payload: Some(b_payload),
        });
        if let Some(ObjectData::Group { children }) = &mut Self::record(&mut inner, f, "/g1").data {
            children.push("a".to_owned());
            children.push("b".to_owned());
            children.sort();
        }

        FileHandle(f)
    }

    /// Registers a single path as resolving to `handle` via `open_file`,
    /// without touching any other bookkeeping.
    pub fn register_path(&self, path: &str, handle: FileHandle) {
        self.inner.lock().unwrap().paths.insert(path.to_owned(), handle.0);
    }

    /// Registers `source_path` and its (default) `.carved` counterpart as
    /// openable by path, pointing at handles created directly via
    /// [`InMemoryHost::seed_source_tree`]/[`InMemoryHost::create_destination`]
    /// — needed so `lifecycle::on_library_terminate`'s reopen-by-path step
    /// can find them in tests.
    pub fn register_open_path(&self, source_path: &str, src: FileHandle, dest: FileHandle) {
        let mut inner = self.inner.lock().unwrap();
        inner.paths.insert(source_path.to_owned(), src.0);
        inner.paths.insert(format!("{source_path}.carved"), dest.0);
    }

    /// Test-only accessor for a dataset's raw payload, bypassing the
    /// `HostLibrary` trait (payload I/O is the host library's concern, not
    /// the carving core's — see `capability.rs`).
    pub fn dataset_payload(&self, dataset: ObjectHandle) -> Option<Vec<u8>> {
        let inner = self.inner.lock().unwrap();
        let (file, path) = inner.handle_index.get(&dataset.0)?.clone();
        match &inner.files.get(&file)?.objects.get(&path)?.data {
            Some(ObjectData::Dataset { payload, .. }) => payload.clone(),
            _ => None,
        }
    }
}

impl HostLibrary for InMemoryHost {
    fn open_file(&self, path: &str, _flags: OpenFlags) -> CarveResult<FileHandle> {
        let inner = self.inner.lock().unwrap();
        inner
            .paths
            .get(path)
            .map(|&f| FileHandle(f))
            .ok_or_else(|| CarveError::HostLibraryFailure(format!("no such file: {path}")))
    }

    fn create_file(&self, path: &str) -> CarveResult<FileHandle> {
        let mut inner = self.inner.lock().unwrap();
        inner.next_file += 1;
        let file = inner.next_file;
        let mut state = FileState::default();
        state.objects.insert("/".to_owned(), ObjectRecord { data: Some(ObjectData::Group { children: Vec::new() }), attributes: Vec::new() });
        inner.files.insert(file, state);
        inner.paths.insert(path.to_owned(), file);
        Ok(FileHandle(file))
    }

    fn close_file(&self, _file: FileHandle) -> CarveResult<()> {
        Ok(())
    }

    fn file_exists(&self, path: &str) -> bool {
        self.inner.lock().unwrap().paths.contains_key(path)
    }

    fn root_group(&self, file: FileHandle) -> CarveResult<ObjectHandle> {
        self.open_object_by_path(file, &ObjectPath::new("/"))
    }

    fn open_object_by_path(&self, file: FileHandle, path: &ObjectPath) -> CarveResult<ObjectHandle> {
        let mut inner = self.inner.lock().unwrap();
        let exists = inner.files.get(&file.0).map(|s| s.objects.contains_key(path.as_str())).unwrap_or(false);
        if !exists {
            return Err(CarveError::HostLibraryFailure(format!("no such object: {path}")));
        }
        Ok(ObjectHandle(Self::alloc_handle(&mut inner, file.0, path.as_str().to_owned())))
    }

    fn object_kind(&self, object: ObjectHandle) -> CarveResult<ObjectKind> {
        let inner = self.inner.lock().unwrap();
        let (file, path) = inner.handle_index.get(&object.0).cloned().expect("valid handle");
        match inner.files[&file].objects.get(&path).and_then(|r| r.data.as_ref()) {
            Some(ObjectData::Group { .. }) => Ok(ObjectKind::Group),
            Some(ObjectData::Dataset { .. }) => Ok(ObjectKind::Dataset),
            None => Ok(ObjectKind::Bad),
        }
    }

    fn object_path(&self, object: ObjectHandle) -> CarveResult<ObjectPath> {
        let inner = self.inner.lock().unwrap();
        let (_, path) = inner.handle_index.get(&object.0).expect("valid handle");
        Ok(ObjectPath::new(path.clone()))
    }

    fn create_group(&self, file: FileHandle, parent: ObjectHandle, name: &str) -> CarveResult<ObjectHandle> {
        let mut inner = self.inner.lock().unwrap();
        let (_, parent_path) = inner.handle_index.get(&parent.0).cloned().expect("valid handle");
        let child_path = ObjectPath::new(parent_path.clone()).join(name);
        Self::record(&mut inner, file.0, child_path.as_str()).data = Some(ObjectData::Group { children: Vec::new() });
        if let Some(ObjectData::Group { children }) = &mut Self::record(&mut inner, file.0, &parent_path).data {
            children.push(name.to_owned());
        }
        Ok(ObjectHandle(Self::alloc_handle(&mut inner, file.0, child_path.as_str().to_owned())))
    }

    fn dataset_datatype(&self, dataset: ObjectHandle) -> CarveResult<Datatype> {
        let inner = self.inner.lock().unwrap();
        let (file, path) = inner.handle_index.get(&dataset.0).cloned().expect("valid handle");
        match &inner.files[&file].objects[&path].data {
            Some(ObjectData::Dataset { datatype, .. }) => Ok(datatype.clone()),
            _ => Err(CarveError::HostLibraryFailure("not a dataset".to_owned())),
        }
    }

    fn dataset_dataspace(&self, dataset: ObjectHandle) -> CarveResult<Dataspace> {
        let inner = self.inner.lock().unwrap();
        let (file, path) = inner.handle_index.get(&dataset.0).cloned().expect("valid handle");
        match &inner.files[&file].objects[&path].data {
            Some(ObjectData::Dataset { dataspace, .. }) => Ok(dataspace.clone()),
            _ => Err(CarveError::HostLibraryFailure("not a dataset".to_owned())),
        }
    }

    fn dataset_creation_properties(&self, dataset: ObjectHandle) -> CarveResult<CreationProperties> {
        let inner = self.inner.lock().unwrap();
        let (file, path) = inner.handle_index.get(&dataset.0).cloned().expect("valid handle");
        match &inner.files[&file].objects[&path].data {
            Some(ObjectData::Dataset { props, .. }) => Ok(props.clone()),
            _ => Err(CarveError::HostLibraryFailure("not a dataset".to_owned())),
        }
    }

    fn create_dataset(
        &self,
        file: FileHandle,
        parent: ObjectHandle,
        name: &str,
        datatype: &Datatype,
        dataspace: &Dataspace,
        creation_properties: &CreationProperties,
    ) -> CarveResult<ObjectHandle> {
        let mut inner = self.inner.lock().unwrap();
        let (_, parent_path) = inner.handle_index.get(&parent.0).cloned().expect("valid handle");
        let child_path = ObjectPath::new(parent_path.clone()).join(name);
        Self::record(&mut inner, file.0, child_path.as_str()).data = Some(ObjectData::Dataset {
            datatype: datatype.clone(),
            dataspace: dataspace.clone(),
            props: creation_properties.clone(),
            payload: None,
        });
        if let Some(ObjectData::Group { children }) = &mut Self::record(&mut inner, file.0, &parent_path).data {
            children.push(name.to_owned());
        }
        Ok(ObjectHandle(Self::alloc_handle(&mut inner, file.0, child_path.as_str().to_owned())))
    }

    fn delete_link(&self, file: FileHandle, parent: ObjectHandle, name: &str) -> CarveResult<()> {
        let mut inner = self.inner.lock().unwrap();
        let (_, parent_path) = inner.handle_index.get(&parent.0).cloned().expect("valid handle");
        let child_path = ObjectPath::new(parent_path.clone()).join(name);
        inner.files.get_mut(&file.0).unwrap().objects.remove(child_path.as_str());
        if let Some(ObjectData::Group { children }) = &mut Self::record(&mut inner, file.0, &parent_path).data {
            children.retain(|c| c != name);
        }
        Ok(())
    }

    fn delete_attribute(&self, object: ObjectHandle, name: &str) -> CarveResult<()> {
        let mut inner = self.inner.lock().unwrap();
        let (file, path) = inner.handle_index.get(&object.0).cloned().expect("valid handle");
        inner.files.get_mut(&file).unwrap().objects.get_mut(&path).unwrap().attributes.retain(|(n, _)| n != name);
        Ok(())
    }

    fn copy_object(
        &self,
        src_file: FileHandle,
        src_path: &ObjectPath,
        dst_file: FileHandle,
        dst_path: &ObjectPath,
    ) -> CarveResult<()> {
        let mut inner = self.inner.lock().unwrap();
        let src_data = inner.files[&src_file.0]
            .objects
            .get(src_path.as_str())
            .and_then(|r| r.data.clone())
            .ok_or_else(|| CarveError::HostLibraryFailure(format!("no such source object: {src_path}")))?;

        inner
            .files
            .get_mut(&dst_file.0)
            .unwrap()
            .objects
            .insert(dst_path.as_str().to_owned(), ObjectRecord { data: Some(src_data), attributes: Vec::new() });

        if let Some((parent, name)) = dst_path.split_parent() {
            if let Some(ObjectData::Group { children }) =
                &mut Self::record(&mut inner, dst_file.0, parent.as_str()).data
            {
                if !children.iter().any(|c| c == name) {
                    children.push(name.to_owned());
                    children.sort();
                }
            }
        }
        Ok(())
    }

    fn list_links(&self, group: ObjectHandle) -> CarveResult<Vec<String>> {
        let inner = self.inner.lock().unwrap();
        let (file, path) = inner.handle_index.get(&group.0).cloned().expect("valid handle");
        match &inner.files[&file].objects[&path].data {
            Some(ObjectData::Group { children }) => {
                let mut names = children.clone();
                names.sort();
                Ok(names)
            }
            _ => Err(CarveError::HostLibraryFailure("not a group".to_owned())),
        }
    }

    fn list_attributes(&self, object: ObjectHandle) -> CarveResult<Vec<String>> {
        let inner = self.inner.lock().unwrap();
        let (file, path) = inner.handle_index.get(&object.0).cloned().expect("valid handle");
        let mut names: Vec<String> = inner.files[&file].objects[&path].attributes.iter().map(|(n, _)| n.clone()).collect();
        names.sort();
        Ok(names)
    }

    fn read_attribute(&self, object: ObjectHandle, name: &str) -> CarveResult<Attribute> {
        let inner = self.inner.lock().unwrap();
        let (file, path) = inner.handle_index.get(&object.0).cloned().expect("valid handle");
        inner.files[&file].objects[&path]
            .attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, a)| a.clone())
            .ok_or_else(|| CarveError::HostLibraryFailure(format!("no such attribute: {name}")))
    }

    fn write_attribute(&self, object: ObjectHandle, name: &str, attribute: &Attribute) -> CarveResult<()> {
        let mut inner = self.inner.lock().unwrap();
        let (file, path) = inner.handle_index.get(&object.0).cloned().expect("valid handle");
        let record = inner.files.get_mut(&file).unwrap().objects.get_mut(&path).unwrap();
        record.attributes.retain(|(n, _)| n != name);
        record.attributes.push((name.to_owned(), attribute.clone()));
        Ok(())
    }

    fn object_exists(&self, file: FileHandle, path: &ObjectPath) -> bool {
        self.inner.lock().unwrap().files.get(&file.0).map(|s| s.objects.contains_key(path.as_str())).unwrap_or(false)
    }
}
