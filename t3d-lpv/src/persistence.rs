use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::mem;
use std::path::Path;

use bytemuck::{Pod, Zeroable};
use glam::{IVec3, UVec3, Vec4};
use log::info;
use thiserror::Error;

use crate::linear_len;

#[derive(Error, Debug)]
pub enum LpvFileError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("corrupted file: expected {expected} bytes, got {actual}")]
    CorruptFile { expected: u64, actual: u64 },

    #[error("invalid volume dimensions: {0}")]
    InvalidDimensions(IVec3),

    #[error("volume dimensions don't match: expected {expected}, got {actual}")]
    DimensionMismatch { expected: UVec3, actual: UVec3 },
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
struct FileVoxel {
    direct: [f32; 4],
    propagated: [f32; 4],
}

const HEADER_SIZE: u64 = 3 * mem::size_of::<i32>() as u64;
const VOXEL_SIZE: u64 = mem::size_of::<FileVoxel>() as u64;

/// Baked volume, as stored on disk.
///
/// The file holds three native-endian `i32`s with the volume's size,
/// followed by eight `f32`s per voxel (direct RGBA, then propagated RGBA) in
/// the grid's linear order. Only colors decoded at zero direction get
/// stored, so directional information is lost on a save-load round trip.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LpvFile {
    pub size: UVec3,
    pub direct: Vec<Vec4>,
    pub propagated: Vec<Vec4>,
}

impl LpvFile {
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), LpvFileError> {
        let path = path.as_ref();

        info!("Saving volume to `{}`; size={}", path.display(), self.size);

        let mut writer = BufWriter::new(File::create(path)?);

        self.write(&mut writer)?;
        writer.flush()?;

        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LpvFileError> {
        let path = path.as_ref();

        info!("Loading volume from `{}`", path.display());

        Self::read(BufReader::new(File::open(path)?))
    }

    pub fn write(&self, mut writer: impl Write) -> Result<(), LpvFileError> {
        let len = linear_len(self.size);

        if len != Some(self.direct.len()) || len != Some(self.propagated.len())
        {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "voxel count doesn't match volume size",
            )
            .into());
        }

        for axis in self.size.to_array() {
            writer.write_all(&(axis as i32).to_ne_bytes())?;
        }

        let voxels: Vec<_> = self
            .direct
            .iter()
            .zip(&self.propagated)
            .map(|(direct, propagated)| FileVoxel {
                direct: direct.to_array(),
                propagated: propagated.to_array(),
            })
            .collect();

        writer.write_all(bytemuck::cast_slice(&voxels))?;

        Ok(())
    }

    pub fn read(mut reader: impl Read) -> Result<Self, LpvFileError> {
        let mut bytes = Vec::new();

        reader.read_to_end(&mut bytes)?;

        if (bytes.len() as u64) < HEADER_SIZE {
            return Err(LpvFileError::CorruptFile {
                expected: HEADER_SIZE,
                actual: bytes.len() as u64,
            });
        }

        let (header, body) = bytes.split_at(HEADER_SIZE as usize);

        let header: Vec<_> = header
            .chunks_exact(4)
            .map(|chunk| {
                i32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]])
            })
            .collect();

        let size = IVec3::new(header[0], header[1], header[2]);

        if size.cmplt(IVec3::ZERO).any() {
            return Err(LpvFileError::InvalidDimensions(size));
        }

        let size = size.as_uvec3();

        let Some(expected) = (size.x as u64)
            .checked_mul(size.y as u64)
            .and_then(|len| len.checked_mul(size.z as u64))
            .and_then(|len| len.checked_mul(VOXEL_SIZE))
        else {
            return Err(LpvFileError::InvalidDimensions(size.as_ivec3()));
        };

        if body.len() as u64 != expected {
            return Err(LpvFileError::CorruptFile {
                expected: HEADER_SIZE + expected,
                actual: bytes.len() as u64,
            });
        }

        let (direct, propagated) = body
            .chunks_exact(VOXEL_SIZE as usize)
            .map(|chunk| {
                let voxel: FileVoxel = bytemuck::pod_read_unaligned(chunk);

                (
                    Vec4::from_array(voxel.direct),
                    Vec4::from_array(voxel.propagated),
                )
            })
            .unzip();

        Ok(Self {
            size,
            direct,
            propagated,
        })
    }
}
