//! Raw tensor dumps: `N * C * H * W` little-endian `f32` values, no header.

use crate::tensor::{OwnedTensor, TensorShape, TensorView};
use crate::util::{YoloPostError, YoloPostResult};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

fn io_err(err: std::io::Error) -> YoloPostError {
    YoloPostError::TensorIo {
        reason: err.to_string(),
    }
}

/// Reads exactly `shape.len()` values from `reader`.
///
/// Trailing bytes after the declared shape are rejected.
pub fn read_raw_tensor<R: Read>(mut reader: R, shape: TensorShape) -> YoloPostResult<OwnedTensor> {
    let mut data = vec![0.0f32; shape.len()?];
    reader
        .read_f32_into::<LittleEndian>(&mut data)
        .map_err(io_err)?;

    let mut trailing = [0u8; 1];
    if reader.read(&mut trailing).map_err(io_err)? != 0 {
        return Err(YoloPostError::TensorIo {
            reason: "trailing data after declared tensor shape".to_string(),
        });
    }
    OwnedTensor::new(data, shape)
}

/// Loads a raw tensor dump from disk.
pub fn load_raw_tensor<P: AsRef<Path>>(path: P, shape: TensorShape) -> YoloPostResult<OwnedTensor> {
    let file = File::open(path).map_err(io_err)?;
    read_raw_tensor(BufReader::new(file), shape)
}

/// Writes the declared elements of `view` to `writer`.
pub fn write_raw_tensor<W: Write>(mut writer: W, view: TensorView<'_>) -> YoloPostResult<()> {
    let len = view.shape().len()?;
    for &value in &view.as_slice()[..len] {
        writer.write_f32::<LittleEndian>(value).map_err(io_err)?;
    }
    writer.flush().map_err(io_err)
}

/// Saves `view` as a raw tensor dump.
pub fn save_raw_tensor<P: AsRef<Path>>(path: P, view: TensorView<'_>) -> YoloPostResult<()> {
    let file = File::create(path).map_err(io_err)?;
    write_raw_tensor(BufWriter::new(file), view)
}

#[cfg(test)]
mod tests {
    use super::{read_raw_tensor, write_raw_tensor};
    use crate::tensor::{TensorShape, TensorView};

    #[test]
    fn dump_layout_is_little_endian_f32() {
        let data = [1.0f32, -2.5];
        let view = TensorView::from_slice(&data, 1, 2, 1, 1).unwrap();
        let mut bytes = Vec::new();
        write_raw_tensor(&mut bytes, view).unwrap();
        assert_eq!(bytes.len(), 8);
        assert_eq!(&bytes[..4], &1.0f32.to_le_bytes());

        let loaded = read_raw_tensor(bytes.as_slice(), view.shape()).unwrap();
        assert_eq!(loaded.data(), &data);
    }

    #[test]
    fn short_and_long_dumps_are_rejected() {
        let shape = TensorShape::new(1, 2, 1, 1);
        let short = 1.0f32.to_le_bytes();
        assert!(read_raw_tensor(&short[..], shape).is_err());

        let long = [0u8; 9];
        assert!(read_raw_tensor(&long[..], shape).is_err());
    }
}
