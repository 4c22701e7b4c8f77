#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use crate::container::{
        Metadata, PixelBuffer, PixelEndianness, PixelFormat, PixelInfo, PoseEvent, SensorFrame,
    };
    use crate::correction::{CorrectedImage, Samples};
    use crate::export::error::ExportError;
    use crate::export::{RasterWriter, TiffRasterWriter, render_preview, write_to_path};

    fn gray16(width: usize, height: usize) -> CorrectedImage {
        CorrectedImage {
            width,
            height,
            channels: 1,
            samples: Samples::U16((0..width * height).map(|v| v as u16 * 257).collect()),
        }
    }

    fn mono16_frame() -> SensorFrame {
        let data: Vec<u8> = (0..16u16).flat_map(|v| (v * 4000).to_le_bytes()).collect();
        let info = PixelInfo {
            size: data.len() as u32,
            width: 4,
            height: 4,
            pitch: 4,
            format: PixelFormat::Mono16,
            compressed: false,
            endianness: PixelEndianness::Little,
        };
        SensorFrame {
            pixel: PixelBuffer::new(data, info),
            metadata: Metadata::default(),
            pose: PoseEvent::default(),
            preview: None,
        }
    }

    #[test]
    fn tiff_writer_emits_little_endian_tiff() {
        let mut output = Cursor::new(Vec::new());
        TiffRasterWriter
            .write_raster(&gray16(4, 4), &mut output)
            .unwrap();
        let bytes = output.into_inner();
        assert_eq!(&bytes[..4], b"II\x2A\x00");
    }

    #[test]
    fn tiff_writer_rejects_odd_channel_counts() {
        let mut image = gray16(4, 4);
        image.channels = 2;
        let mut output = Cursor::new(Vec::new());
        let err = TiffRasterWriter
            .write_raster(&image, &mut output)
            .unwrap_err();
        assert!(matches!(err, ExportError::Encode(_)));
    }

    #[test]
    fn render_preview_emits_jpeg() {
        let jpeg = render_preview(&mono16_frame()).unwrap();
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn render_preview_fails_for_empty_frame() {
        let frame = SensorFrame::default();
        assert!(render_preview(&frame).is_err());
    }

    #[test]
    fn write_to_path_dispatches_on_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.tiff");
        write_to_path(&gray16(4, 4), &path).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);

        let path = dir.path().join("out.png");
        write_to_path(&gray16(4, 4), &path).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn write_to_path_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let err = write_to_path(&gray16(4, 4), &dir.path().join("out.bmp")).unwrap_err();
        assert!(matches!(err, ExportError::UnsupportedFormat(_)));
    }

    #[test]
    fn jpeg_output_requires_8bit_samples() {
        let dir = tempfile::tempdir().unwrap();
        let err = write_to_path(&gray16(4, 4), &dir.path().join("out.jpg")).unwrap_err();
        assert!(matches!(err, ExportError::UnsupportedFormat(_)));
    }

    #[test]
    fn empty_image_cannot_be_exported() {
        let dir = tempfile::tempdir().unwrap();
        let err = write_to_path(&CorrectedImage::empty(), &dir.path().join("out.tiff")).unwrap_err();
        assert!(matches!(err, ExportError::Encode(_)));
    }
}
