use aeroframe::correction::CorrectionOptions;
use aeroframe::{SensorFrame, logger};

use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    logger::init();

    info!("Starting aeroframe...");

    let mut args = std::env::args().skip(1);
    let input = args.next().unwrap_or_else(|| "input.aef".to_string());
    let output = args.next().unwrap_or_else(|| "output.tiff".to_string());

    let frame = SensorFrame::load(&input)?;
    info!(
        "Frame: {}x{} {} ({} bit, {})",
        frame.pixel.width(),
        frame.pixel.height(),
        frame.pixel.format(),
        frame.pixel.bit_depth(),
        if frame.pose.is_valid() {
            "georeferenced"
        } else {
            "no pose"
        }
    );

    let options = CorrectionOptions::builder().convert_to_8bit(false).build();
    match frame.export(&output, &options) {
        Ok(()) => info!("Export successful!"),
        Err(e) => error!("Export failed: {}", e),
    }

    Ok(())
}
