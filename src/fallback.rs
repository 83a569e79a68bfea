//! Fallback Metadata Writer (spec §4.5), grounded on
//! `create_fallback_metadata` in `H5carve_helper_functions.c`: a single
//! compound attribute on the destination root group recording how to reach
//! the original file.

use crate::capability::{Attribute, AttributeValue, Dataspace, FileHandle, HostLibrary};
use crate::datatype::{CompoundField, Datatype};
use crate::error::CarveResult;
use crate::model::{FallbackMetadata, FileKind, FALLBACK_METADATA};
use crate::path_mapper;

/// Writes `FALLBACK_METADATA` on `dest_file`'s root group, recording
/// `source_path` as a local-filesystem fallback target.
///
/// `REMOTE` fallbacks are named in the layout (spec §4.5) but have no
/// producer in this engine; only [`FileKind::Local`] is ever written here.
pub fn write(host: &dyn HostLibrary, dest_file: FileHandle, source_path: &str) -> CarveResult<()> {
    let root = host.root_group(dest_file)?;
    let attribute = encode(&path_mapper::absolute_path(source_path));
    host.write_attribute(root, FALLBACK_METADATA, &attribute)
}

fn encode(source_path: &str) -> Attribute {
    let path_bytes = source_path.as_bytes().to_vec();
    let path_len = path_bytes.len();

    let datatype = Datatype::Compound {
        size: 1 + path_len,
        fields: vec![
            CompoundField { name: "FALLBACK_TYPE".to_owned(), offset: 0, datatype: Datatype::Atomic { size: 1 } },
            CompoundField { name: "PATH".to_owned(), offset: 1, datatype: Datatype::Atomic { size: path_len } },
        ],
    };

    let record = vec![
        ("FALLBACK_TYPE".to_owned(), AttributeValue::Atomic(vec![FileKind::Local as u8])),
        ("PATH".to_owned(), AttributeValue::Atomic(path_bytes)),
    ];

    Attribute { datatype, dataspace: Dataspace::scalar(), value: AttributeValue::Compound(vec![record]) }
}

/// Decodes a previously written `FALLBACK_METADATA` attribute.
pub fn decode(attribute: &Attribute) -> Option<FallbackMetadata> {
    let AttributeValue::Compound(records) = &attribute.value else { return None };
    let record = records.first()?;

    let mut kind = None;
    let mut path = None;
    for (name, value) in record {
        match (name.as_str(), value) {
            ("FALLBACK_TYPE", AttributeValue::Atomic(bytes)) if bytes.len() == 1 => {
                kind = Some(if bytes[0] == 0 { FileKind::Local } else { FileKind::Remote });
            }
            ("PATH", AttributeValue::Atomic(bytes)) => {
                path = String::from_utf8(bytes.clone()).ok();
            }
            _ => {}
        }
    }

    Some(FallbackMetadata { kind: kind?, path: path? })
}
