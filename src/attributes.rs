//! Attribute Copier (spec §4.3), grounded on `copy_attributes` and its
//! per-class helpers (`copy_compound_type`, `copy_vlen_type`, `copy_array`,
//! `copy_reference_object*`, `get_total_num_elems_and_base_type`) in
//! `H5carve_helper_functions.c`.
//!
//! The original walks a `void*` buffer with manual `(base_offset,
//! element_stride)` bookkeeping (spec §9); here the same recursion walks
//! the [`AttributeValue`] tagged union instead, one match arm per datatype
//! class.

use crate::capability::{Attribute, AttributeValue, FileHandle, HostLibrary, ObjectHandle};
use crate::datatype::{Datatype, MAX_RECURSION_DEPTH};
use crate::error::{CarveError, CarveResult};

/// Copies every attribute of `src_object` onto `dst_object`, name-sorted
/// ascending (spec §4.3 ordering guarantee — trusted from
/// [`HostLibrary::list_attributes`]'s own contract).
pub fn copy_object_attributes(
    host: &dyn HostLibrary,
    src_file: FileHandle,
    src_object: ObjectHandle,
    dst_file: FileHandle,
    dst_object: ObjectHandle,
) -> CarveResult<()> {
    for name in host.list_attributes(src_object)? {
        copy_one(host, src_file, src_object, dst_file, dst_object, &name)?;
    }
    Ok(())
}

/// Copies one attribute by name. Idempotent: [`HostLibrary::write_attribute`]
/// overwrites an existing attribute of the same name (spec §8 invariant 6).
pub fn copy_one(
    host: &dyn HostLibrary,
    src_file: FileHandle,
    src_object: ObjectHandle,
    dst_file: FileHandle,
    dst_object: ObjectHandle,
    name: &str,
) -> CarveResult<()> {
    let attribute = host.read_attribute(src_object, name)?;
    let value = copy_value(host, src_file, dst_file, &attribute.datatype, &attribute.value, 0)?;
    let out = Attribute { datatype: attribute.datatype.clone(), dataspace: attribute.dataspace.clone(), value };
    host.write_attribute(dst_object, name, &out)
}

fn copy_value(
    host: &dyn HostLibrary,
    src_file: FileHandle,
    dst_file: FileHandle,
    datatype: &Datatype,
    value: &AttributeValue,
    depth: usize,
) -> CarveResult<AttributeValue> {
    if depth > MAX_RECURSION_DEPTH {
        return Err(CarveError::DatatypeTooDeep);
    }

    match datatype {
        Datatype::Atomic { .. } => Ok(value.clone()),

        Datatype::ObjectRef { .. } => {
            let AttributeValue::ObjectRef(targets) = value else {
                return Err(CarveError::HostLibraryFailure(
                    "object-reference datatype with non-reference value".to_owned(),
                ));
            };
            for target in targets {
                if !host.object_exists(dst_file, target) {
                    return Err(CarveError::DanglingReference(target.as_str().to_owned()));
                }
            }
            Ok(AttributeValue::ObjectRef(targets.clone()))
        }

        Datatype::RegionRef => Err(CarveError::UnsupportedDatatype("region reference")),

        Datatype::Compound { fields, .. } => {
            let AttributeValue::Compound(records) = value else {
                return Err(CarveError::HostLibraryFailure(
                    "compound datatype with non-compound value".to_owned(),
                ));
            };
            let mut out_records = Vec::with_capacity(records.len());
            for record in records {
                if record.len() != fields.len() {
                    return Err(CarveError::HostLibraryFailure(
                        "compound record member count does not match datatype".to_owned(),
                    ));
                }
                let mut out_record = Vec::with_capacity(fields.len());
                for (field, (member_name, member_value)) in fields.iter().zip(record.iter()) {
                    if &field.name != member_name {
                        return Err(CarveError::HostLibraryFailure(format!(
                            "compound member order mismatch: expected {}, got {member_name}",
                            field.name
                        )));
                    }
                    let copied = copy_value(host, src_file, dst_file, &field.datatype, member_value, depth + 1)?;
                    out_record.push((member_name.clone(), copied));
                }
                out_records.push(out_record);
            }
            Ok(AttributeValue::Compound(out_records))
        }

        Datatype::Vlen { element } => {
            let AttributeValue::Vlen(lists) = value else {
                return Err(CarveError::HostLibraryFailure(
                    "variable-length datatype with non-vlen value".to_owned(),
                ));
            };
            let mut out_lists = Vec::with_capacity(lists.len());
            for list in lists {
                let mut out_list = Vec::with_capacity(list.len());
                for element_value in list {
                    out_list.push(copy_value(host, src_file, dst_file, element, element_value, depth + 1)?);
                }
                out_lists.push(out_list);
            }
            Ok(AttributeValue::Vlen(out_lists))
        }

        Datatype::Array { .. } => {
            let AttributeValue::Array(elements) = value else {
                return Err(CarveError::HostLibraryFailure("array datatype with non-array value".to_owned()));
            };
            let (total_count, base) = datatype.array_base(depth)?;
            if elements.len() != total_count {
                return Err(CarveError::HostLibraryFailure(format!(
                    "array element count mismatch: expected {total_count}, got {}",
                    elements.len()
                )));
            }
            let mut out_elements = Vec::with_capacity(elements.len());
            for element_value in elements {
                out_elements.push(copy_value(host, src_file, dst_file, base, element_value, depth + 1)?);
            }
            Ok(AttributeValue::Array(out_elements))
        }
    }
}
