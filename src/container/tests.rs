#[cfg(test)]
mod tests {
    use byteorder::{BigEndian, WriteBytesExt};

    use crate::container::error::ContainerError;
    use crate::container::format::{PixelEndianness, PixelFormat};
    use crate::container::metadata::Metadata;
    use crate::container::pixel::{PixelBuffer, PixelInfo};
    use crate::container::pose::PoseEvent;
    use crate::container::writer::SaveOptions;
    use crate::container::{PayloadCompressor, SensorFrame, ZlibCompressor, decode, encode};

    fn pixel_info(
        width: u32,
        height: u32,
        format: PixelFormat,
        endianness: PixelEndianness,
        byte_size: u32,
    ) -> PixelInfo {
        PixelInfo {
            size: byte_size,
            width,
            height,
            pitch: width,
            format,
            compressed: false,
            endianness,
        }
    }

    fn mono16_frame() -> SensorFrame {
        let values: Vec<u16> = (0..16).map(|v| v * 1000).collect();
        let data: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        let info = pixel_info(
            4,
            4,
            PixelFormat::Mono16,
            PixelEndianness::Little,
            data.len() as u32,
        );
        SensorFrame {
            pixel: PixelBuffer::new(data, info),
            metadata: Metadata {
                vendor: Some("ACME Optics".to_string()),
                serial: Some("SN-0042".to_string()),
                image_id: Some(7),
                exposure_us: Some(1250),
                comment: Some("calibration flight".to_string()),
                affix: Some("cal".to_string()),
                ..Metadata::default()
            },
            pose: PoseEvent {
                timestamp_ms: Some(1_600_000_000_123),
                roll: 1.5,
                pitch: -0.25,
                yaw: 92.0,
                lat: 52.52,
                lon: 13.405,
                alt: 812.0,
                vel_north: 61.0,
                vel_east: -2.5,
                vel_up: 0.1,
            },
            preview: None,
        }
    }

    /// Hand-built version-1 container: no endianness word in the header.
    fn v1_container(format: PixelFormat, width: u32, height: u32, payload: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.write_i32::<BigEndian>(i32::from_be_bytes(*b"MIC#")).unwrap();
        out.write_i32::<BigEndian>(1).unwrap();

        let header_size = 16 * 4u32;
        let offset_meta = header_size;
        let meta_payload = *b"EOR#";
        let offset_pixel = offset_meta + 8 + meta_payload.len() as u32;
        for (tag, offset) in [
            (0x0100_0000, offset_meta),
            (0x0200_0000, 0),
            (0x0300_0000, 0),
            (0x0400_0000, offset_pixel),
        ] {
            out.write_i32::<BigEndian>(tag).unwrap();
            out.write_i32::<BigEndian>(offset as i32).unwrap();
        }
        for word in [
            payload.len() as u32,
            width,
            height,
            width,
            format.to_wire(),
            0,
        ] {
            out.write_u32::<BigEndian>(word).unwrap();
        }

        out.write_i32::<BigEndian>(i32::from_be_bytes(*b"MMD#")).unwrap();
        out.write_u32::<BigEndian>(meta_payload.len() as u32).unwrap();
        out.extend_from_slice(&meta_payload);

        out.write_i32::<BigEndian>(i32::from_be_bytes(*b"MID#")).unwrap();
        out.write_u32::<BigEndian>(payload.len() as u32).unwrap();
        out.extend_from_slice(payload);
        out
    }

    #[test]
    fn unpack_12bit_little_endian_reference_vector() {
        let info = pixel_info(
            2,
            1,
            PixelFormat::Mono12Packed,
            PixelEndianness::Little,
            3,
        );
        let buffer = PixelBuffer::new(vec![0x12, 0x34, 0x56], info);
        let samples = buffer.canonical();
        let expected1: u16 = (0x12 | ((0x34 & 0x0F) << 8)) << 4;
        let expected2: u16 = (0x34 & 0xF0) | (0x56 << 8);
        assert_eq!(samples, vec![expected1, expected2]);
        assert_eq!(samples, vec![0x4120, 0x5630]);
    }

    #[test]
    fn unpack_12bit_big_endian_reference_vector() {
        let info = pixel_info(2, 1, PixelFormat::Mono12Packed, PixelEndianness::Big, 3);
        let buffer = PixelBuffer::new(vec![0x12, 0x34, 0x56], info);
        let samples = buffer.canonical();
        let expected1: u16 = ((0x34 & 0x0F) << 4) | (0x12 << 8);
        let expected2: u16 = (0x34 & 0xF0) | (0x56 << 8);
        assert_eq!(samples, vec![expected1, expected2]);
        assert_eq!(samples, vec![0x1240, 0x5630]);
    }

    #[test]
    fn canonical_swaps_big_endian_16bit() {
        let info = pixel_info(2, 1, PixelFormat::Mono16, PixelEndianness::Big, 4);
        let buffer = PixelBuffer::new(vec![0x12, 0x34, 0xAB, 0xCD], info);
        assert_eq!(buffer.canonical(), vec![0x1234, 0xABCD]);

        let info = pixel_info(2, 1, PixelFormat::Mono16, PixelEndianness::Little, 4);
        let buffer = PixelBuffer::new(vec![0x12, 0x34, 0xAB, 0xCD], info);
        assert_eq!(buffer.canonical(), vec![0x3412, 0xCDAB]);
    }

    #[test]
    fn canonical_drops_pitch_padding() {
        // 2 pixels per row, stored with a pitch of 3 pixels
        let mut info = pixel_info(2, 2, PixelFormat::Mono16, PixelEndianness::Little, 12);
        info.pitch = 3;
        let data: Vec<u8> = [1u16, 2, 9999, 3, 4, 9999]
            .iter()
            .flat_map(|v| v.to_le_bytes())
            .collect();
        let buffer = PixelBuffer::new(data, info);
        assert_eq!(buffer.canonical(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn canonical_requires_known_format_and_endianness() {
        let info = pixel_info(2, 1, PixelFormat::Invalid, PixelEndianness::Little, 4);
        assert!(PixelBuffer::new(vec![0; 4], info).canonical().is_empty());

        let info = pixel_info(2, 1, PixelFormat::Mono16, PixelEndianness::Undefined, 4);
        assert!(PixelBuffer::new(vec![0; 4], info).canonical().is_empty());
    }

    #[test]
    fn canonical_rejects_undersized_payload() {
        let info = pixel_info(4, 4, PixelFormat::Mono16, PixelEndianness::Little, 32);
        assert!(PixelBuffer::new(vec![0; 10], info).canonical().is_empty());
    }

    #[test]
    fn buffer_predicates_follow_format() {
        let info = pixel_info(2, 2, PixelFormat::BayerGR12Packed, PixelEndianness::Big, 6);
        let buffer = PixelBuffer::new(vec![0; 6], info);
        assert!(buffer.is_valid());
        assert!(buffer.is_color());
        assert!(!buffer.is_mono());
        assert_eq!(buffer.bit_depth(), 12);
        assert!(!PixelBuffer::empty().is_valid());
    }

    #[test]
    fn version1_packed_bayer_reads_big_endian() {
        let bytes = v1_container(PixelFormat::BayerGR12Packed, 2, 2, &[0; 6]);
        let frame = decode(&bytes).unwrap();
        assert_eq!(frame.pixel.endianness(), PixelEndianness::Big);
        assert_eq!(frame.pixel.format(), PixelFormat::BayerGR12Packed);
    }

    #[test]
    fn version1_mono16_reads_little_endian() {
        let bytes = v1_container(PixelFormat::Mono16, 2, 2, &[0; 8]);
        let frame = decode(&bytes).unwrap();
        assert_eq!(frame.pixel.endianness(), PixelEndianness::Little);
    }

    #[test]
    fn unsupported_version_is_rejected() {
        let mut bytes = v1_container(PixelFormat::Mono16, 2, 2, &[0; 8]);
        bytes[7] = 3;
        let err = decode(&bytes).unwrap_err();
        assert!(matches!(err, ContainerError::Structural(_)));
    }

    #[test]
    fn round_trip_preserves_pixels_metadata_and_pose() {
        let frame = mono16_frame();
        let bytes = encode(&frame, &SaveOptions::default()).unwrap();
        let decoded = decode(&bytes).unwrap();

        assert_eq!(decoded.pixel.raw_data(), frame.pixel.raw_data());
        assert_eq!(decoded.pixel.width(), 4);
        assert_eq!(decoded.pixel.height(), 4);
        assert_eq!(decoded.pixel.pitch(), 4);
        assert_eq!(decoded.pixel.format(), PixelFormat::Mono16);
        assert_eq!(decoded.pixel.endianness(), PixelEndianness::Little);
        assert_eq!(decoded.metadata, frame.metadata);
        assert_eq!(decoded.pose, frame.pose);
        assert!(decoded.preview.is_none());
    }

    #[test]
    fn round_trip_with_compressed_payload() {
        let frame = mono16_frame();
        let options = SaveOptions::builder().compression(true).build();
        let bytes = encode(&frame, &options).unwrap();
        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded.pixel.raw_data(), frame.pixel.raw_data());
        assert!(!decoded.pixel.info().compressed);
    }

    #[test]
    fn corrupt_container_magic_fails_closed() {
        let frame = mono16_frame();
        let bytes = encode(&frame, &SaveOptions::default()).unwrap();
        for flipped in 0..4 {
            let mut corrupt = bytes.clone();
            corrupt[flipped] ^= 0xFF;
            let err = decode(&corrupt).unwrap_err();
            assert!(matches!(err, ContainerError::Structural(_)));
        }
    }

    #[test]
    fn corrupt_toc_tag_fails_closed() {
        let frame = mono16_frame();
        let mut bytes = encode(&frame, &SaveOptions::default()).unwrap();
        bytes[8] ^= 0xFF; // first table-of-contents tag
        assert!(matches!(
            decode(&bytes).unwrap_err(),
            ContainerError::Structural(_)
        ));
    }

    #[test]
    fn truncated_pixel_section_fails_closed() {
        let frame = mono16_frame();
        let bytes = encode(&frame, &SaveOptions::default()).unwrap();
        let err = decode(&bytes[..bytes.len() - 4]).unwrap_err();
        assert!(matches!(err, ContainerError::Truncated(_)));
    }

    #[test]
    fn unknown_metadata_tags_are_skipped() {
        let mut payload = Vec::new();
        let write_string = |out: &mut Vec<u8>, tag: i32, value: &[u8]| {
            out.write_i32::<BigEndian>(tag).unwrap();
            out.write_u32::<BigEndian>(value.len() as u32).unwrap();
            out.extend_from_slice(value);
        };
        write_string(&mut payload, (0x01 << 16) | 0x0100, b"ACME Optics");
        // unknown field with the int32 type code
        payload.write_i32::<BigEndian>((0x55 << 16) | 0x0004).unwrap();
        payload.write_i32::<BigEndian>(-17).unwrap();
        // unknown field with a fixed 8-byte payload
        payload.write_i32::<BigEndian>((0x66 << 16) | 0x0008).unwrap();
        payload.extend_from_slice(&[0xAA; 8]);
        // unknown field with its own length prefix
        payload.write_i32::<BigEndian>((0x77 << 16) | 0x0200).unwrap();
        payload.write_u32::<BigEndian>(3).unwrap();
        payload.extend_from_slice(b"xyz");
        write_string(&mut payload, (0x04 << 16) | 0x0100, b"SN-0042");
        payload.write_i32::<BigEndian>(i32::from_be_bytes(*b"EOR#")).unwrap();

        let meta = Metadata::decode(&payload).unwrap();
        assert_eq!(meta.vendor.as_deref(), Some("ACME Optics"));
        assert_eq!(meta.serial.as_deref(), Some("SN-0042"));
        assert_eq!(meta.model, None);
    }

    #[test]
    fn truncated_metadata_string_fails() {
        let mut payload = Vec::new();
        payload.write_i32::<BigEndian>((0x01 << 16) | 0x0100).unwrap();
        payload.write_u32::<BigEndian>(100).unwrap();
        payload.extend_from_slice(b"shrt");
        assert!(matches!(
            Metadata::decode(&payload).unwrap_err(),
            ContainerError::Truncated(_)
        ));
    }

    #[test]
    fn metadata_strings_are_capped_on_write() {
        let meta = Metadata {
            vendor: Some("v".repeat(50)),
            comment: Some("c".repeat(200)),
            ..Metadata::default()
        };
        let decoded = Metadata::decode(&meta.encode().unwrap()).unwrap();
        assert_eq!(decoded.vendor.unwrap().len(), 32);
        assert_eq!(decoded.comment.unwrap().len(), 128);
    }

    #[test]
    fn negative_metadata_integers_are_not_written() {
        let meta = Metadata {
            image_id: Some(-5),
            tap_count: Some(2),
            ..Metadata::default()
        };
        let decoded = Metadata::decode(&meta.encode().unwrap()).unwrap();
        assert_eq!(decoded.image_id, None);
        assert_eq!(decoded.tap_count, Some(2));
    }

    #[test]
    fn pose_round_trip() {
        let pose = mono16_frame().pose;
        let decoded = PoseEvent::decode(&pose.encode().unwrap()).unwrap();
        assert_eq!(decoded, pose);
    }

    #[test]
    fn pose_utm_coordinates_are_dropped() {
        let mut payload = Vec::new();
        payload.write_i64::<BigEndian>(42).unwrap();
        payload.write_u8(2).unwrap();
        payload.write_u8(33).unwrap();
        payload.write_u8(b'U').unwrap();
        for value in [400_000.0, 5_800_000.0, 120.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0] {
            payload.write_f64::<BigEndian>(value).unwrap();
        }
        let pose = PoseEvent::decode(&payload).unwrap();
        assert!(pose.is_valid());
        assert_eq!(pose.lat, 0.0);
        assert_eq!(pose.lon, 0.0);
        assert_eq!(pose.alt, 0.0);
        assert_eq!(pose.roll, 1.0);
        assert_eq!(pose.vel_up, 6.0);
    }

    #[test]
    fn pose_unknown_discriminator_fails() {
        let mut payload = Vec::new();
        payload.write_i64::<BigEndian>(42).unwrap();
        payload.write_u8(9).unwrap();
        payload.write_u8(0).unwrap();
        payload.write_u8(0).unwrap();
        for _ in 0..9 {
            payload.write_f64::<BigEndian>(0.0).unwrap();
        }
        assert!(matches!(
            PoseEvent::decode(&payload).unwrap_err(),
            ContainerError::Structural(_)
        ));
    }

    #[test]
    fn invalid_pose_is_omitted_on_write() {
        let mut frame = mono16_frame();
        frame.pose = PoseEvent::default();
        let bytes = encode(&frame, &SaveOptions::default()).unwrap();
        // pose entry of the table of contents
        assert_eq!(u32::from_be_bytes(bytes[20..24].try_into().unwrap()), 0);
        let decoded = decode(&bytes).unwrap();
        assert!(!decoded.pose.is_valid());
    }

    #[test]
    fn embedded_preview_round_trips_as_jpeg() {
        let frame = mono16_frame();
        let options = SaveOptions::builder().preview(true).build();
        let bytes = encode(&frame, &options).unwrap();
        let decoded = decode(&bytes).unwrap();
        let preview = decoded.preview.expect("preview should be embedded");
        assert_eq!(&preview[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn malformed_preview_degrades_to_absent() {
        let frame = mono16_frame();
        let options = SaveOptions::builder().preview(true).build();
        let mut bytes = encode(&frame, &options).unwrap();
        let preview_offset = u32::from_be_bytes(bytes[28..32].try_into().unwrap()) as usize;
        assert_ne!(preview_offset, 0);
        bytes[preview_offset] ^= 0xFF; // break the section magic
        let decoded = decode(&bytes).unwrap();
        assert!(decoded.preview.is_none());
        assert_eq!(decoded.pixel.raw_data(), frame.pixel.raw_data());
    }

    #[test]
    fn zlib_payload_round_trip() {
        let raw: Vec<u8> = (0..1024u32).map(|v| (v % 251) as u8).collect();
        let compressor = ZlibCompressor;
        let packed = compressor.compress(&raw).unwrap();
        assert_ne!(packed.len(), raw.len());
        assert_eq!(compressor.decompress(&packed).unwrap(), raw);
    }

    #[test]
    fn zlib_rejects_length_mismatch() {
        let compressor = ZlibCompressor;
        let mut packed = compressor.compress(&[1, 2, 3, 4]).unwrap();
        packed[3] = 99; // declared length no longer matches
        assert!(matches!(
            compressor.decompress(&packed).unwrap_err(),
            ContainerError::Structural(_)
        ));
    }

    #[test]
    fn save_and_load_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.aef");
        let frame = mono16_frame();
        frame
            .save(&path, &SaveOptions::builder().compression(true).build())
            .unwrap();
        let loaded = SensorFrame::load(&path).unwrap();
        assert_eq!(loaded.pixel.raw_data(), frame.pixel.raw_data());
        assert_eq!(loaded.metadata, frame.metadata);
        assert_eq!(loaded.pose, frame.pose);
    }

    #[test]
    fn load_missing_file_reports_read_error() {
        let err = SensorFrame::load("/nonexistent/frame.aef").unwrap_err();
        assert!(matches!(err, ContainerError::FileRead(_)));
    }
}
