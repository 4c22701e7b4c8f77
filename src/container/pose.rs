//! Fixed-layout geodetic pose record codec.
//!
//! Wire layout, all big-endian: timestamp (i64 Unix milliseconds, 0 when
//! absent), a coordinate-encoding byte plus zone/band bytes, three f64
//! coordinates, roll/pitch/yaw and the north/east/up velocity, f64 each.

use std::io::Cursor;

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use tracing::warn;

use crate::container::error::{ContainerError, Result};

/// Coordinates are latitude/longitude/altitude. Zone and band must be 0.
const COORDS_LAT_LON_ALT: u8 = 1;
/// UTM easting/northing/altitude with a zone number and band letter.
/// Recognised but not supported; the coordinates are dropped on read.
const COORDS_UTM: u8 = 2;

/// One geodetic/orientation/velocity telemetry sample taken at the
/// capture instant. Angles in degrees, velocity in m/s.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PoseEvent {
    /// Capture instant, Unix milliseconds UTC. A pose without a
    /// timestamp is treated as absent by every consumer.
    pub timestamp_ms: Option<i64>,
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
    pub lat: f64,
    pub lon: f64,
    pub alt: f64,
    pub vel_north: f64,
    pub vel_east: f64,
    pub vel_up: f64,
}

impl PoseEvent {
    pub fn is_valid(&self) -> bool {
        self.timestamp_ms.is_some()
    }

    pub fn decode(data: &[u8]) -> Result<PoseEvent> {
        let mut cursor = Cursor::new(data);
        let read_f64 = |cursor: &mut Cursor<&[u8]>| {
            cursor.read_f64::<BigEndian>().map_err(|_| truncated())
        };

        let mut pose = PoseEvent::default();
        let timestamp = cursor.read_i64::<BigEndian>().map_err(|_| truncated())?;
        pose.timestamp_ms = (timestamp != 0).then_some(timestamp);

        let coords = cursor.read_u8().map_err(|_| truncated())?;
        let zone = cursor.read_u8().map_err(|_| truncated())?;
        let band = cursor.read_u8().map_err(|_| truncated())?;
        if coords == COORDS_UTM {
            let _easting = read_f64(&mut cursor)?;
            let _northing = read_f64(&mut cursor)?;
            let _altitude = read_f64(&mut cursor)?;
            warn!(
                "Pose coordinates are encoded as UTM{}{}; they will be ignored",
                zone, band as char
            );
        } else if coords != COORDS_LAT_LON_ALT || zone != 0 || band != 0 {
            return Err(ContainerError::Structural(format!(
                "Unsupported pose coordinate encoding {coords} (zone {zone}, band {band})"
            )));
        } else {
            pose.lat = read_f64(&mut cursor)?;
            pose.lon = read_f64(&mut cursor)?;
            pose.alt = read_f64(&mut cursor)?;
        }

        pose.roll = read_f64(&mut cursor)?;
        pose.pitch = read_f64(&mut cursor)?;
        pose.yaw = read_f64(&mut cursor)?;

        pose.vel_north = read_f64(&mut cursor)?;
        pose.vel_east = read_f64(&mut cursor)?;
        pose.vel_up = read_f64(&mut cursor)?;
        Ok(pose)
    }

    /// Always writes the lat/lon/alt encoding.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        out.write_i64::<BigEndian>(self.timestamp_ms.unwrap_or(0))?;

        out.write_u8(COORDS_LAT_LON_ALT)?;
        out.write_u8(0)?;
        out.write_u8(0)?;
        out.write_f64::<BigEndian>(self.lat)?;
        out.write_f64::<BigEndian>(self.lon)?;
        out.write_f64::<BigEndian>(self.alt)?;

        out.write_f64::<BigEndian>(self.roll)?;
        out.write_f64::<BigEndian>(self.pitch)?;
        out.write_f64::<BigEndian>(self.yaw)?;

        out.write_f64::<BigEndian>(self.vel_north)?;
        out.write_f64::<BigEndian>(self.vel_east)?;
        out.write_f64::<BigEndian>(self.vel_up)?;
        Ok(out)
    }
}

fn truncated() -> ContainerError {
    ContainerError::Truncated("pose record runs past the end of the section".into())
}
