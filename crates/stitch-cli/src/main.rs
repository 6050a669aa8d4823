//! stitch-cli: Command-line tool for exploring full-page stitching
//!
//! Provides commands for printing tile decompositions and for running a
//! complete capture against a synthetic page, without a browser.

use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use image::Rgba;
use serde_json::json;
use stitch_core::{
    capture::{
        CutProvider, FixedCutProvider, FixedRegionProvider, FixedScaleProvider,
        FullPageCaptureAlgorithm, ImageBuffer, ImageProvider, MockViewport, NullCutProvider,
        NullScaleProvider, ScaleProvider, StitchConfig, StitchProviders,
        ViewportScreenshotFactory,
    },
    error::StitchResult,
    geometry::{CoordinatesType, Location, RectangleSize, Region},
    util::encode::{ImageFormat, save_image},
};
use tracing::info;

#[derive(Parser)]
#[command(name = "stitch-cli")]
#[command(about = "CLI tool for exploring tiling and full-page stitching")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the tiles covering a container as JSON
    Tiles {
        /// Container as WxH or L,T,WxH
        #[arg(long)]
        container: String,
        /// Tile size as WxH
        #[arg(long)]
        tile: String,
        /// Use equal-sized, overlapping tiles
        #[arg(long)]
        fixed: bool,
    },
    /// Stitch a synthetic page through a mock viewport and save the result
    StitchDemo {
        /// Page size as WxH
        #[arg(long)]
        content: String,
        /// Viewport size as WxH
        #[arg(long)]
        viewport: String,
        /// Region to capture as l,t,w,h in page coordinates (default: all)
        #[arg(long)]
        region: Option<String>,
        /// Delay after each scroll in milliseconds
        #[arg(long)]
        wait_ms: Option<u64>,
        /// Simulated device pixel ratio, undone by the scale provider
        #[arg(long, default_value_t = 1.0)]
        scale: f64,
        /// Height of a simulated toolbar above the page, cut from every tile
        #[arg(long, default_value_t = 0)]
        header: u32,
        /// Height of a simulated toolbar below the page, cut from every tile
        #[arg(long, default_value_t = 0)]
        footer: u32,
        /// Output file path
        #[arg(short, long)]
        out: PathBuf,
        /// Image format (png, jpeg); guessed from the extension by default
        #[arg(long)]
        format: Option<String>,
        /// Image quality (0-100)
        #[arg(long, default_value_t = 80)]
        quality: u8,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("stitch_cli=info".parse()?)
                .add_directive("stitch_core=warn".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Tiles {
            container,
            tile,
            fixed,
        } => {
            print_tiles(&container, &tile, fixed)?;
        }
        Commands::StitchDemo {
            content,
            viewport,
            region,
            wait_ms,
            scale,
            header,
            footer,
            out,
            format,
            quality,
        } => {
            let options = DemoOptions {
                content: content.parse()?,
                viewport: viewport.parse()?,
                region: region.as_deref().map(parse_region).transpose()?,
                wait: wait_ms.map(Duration::from_millis),
                device_pixel_ratio: scale,
                header,
                footer,
            };
            let format = match format {
                Some(name) => name.parse()?,
                None => ImageFormat::from_path(&out).unwrap_or_default(),
            };
            stitch_demo(options, out, format, quality)?;
        }
    }

    Ok(())
}

/// Parses `WxH`, `L,T,WxH` or `L,T,W,H`
fn parse_region(s: &str) -> Result<Region> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let region = match parts.as_slice() {
        [size] => Region::from_parts(Location::ZERO, size.parse()?),
        [left, top, size] => Region::from_parts(
            Location::new(left.parse()?, top.parse()?),
            size.parse()?,
        ),
        [left, top, width, height] => {
            Region::new(left.parse()?, top.parse()?, width.parse()?, height.parse()?)
        }
        _ => bail!("'{}' is not a region (expected WxH, L,T,WxH or L,T,W,H)", s),
    };
    Ok(region)
}

fn print_tiles(container: &str, tile: &str, fixed: bool) -> Result<()> {
    let container = parse_region(container)?;
    let tile: RectangleSize = tile.parse()?;

    let tiles = container.sub_regions(tile, fixed)?;
    info!("{} tiles of {} cover {}", tiles.len(), tile, container);

    println!("{}", serde_json::to_string_pretty(&tiles)?);
    Ok(())
}

struct DemoOptions {
    content: RectangleSize,
    viewport: RectangleSize,
    region: Option<Region>,
    wait: Option<Duration>,
    device_pixel_ratio: f64,
    header: u32,
    footer: u32,
}

/// Camera over a [`MockViewport`] that adds toolbars and renders at a device
/// pixel ratio, like a phone browser would
struct DeviceCamera {
    viewport: Arc<MockViewport>,
    header: u32,
    footer: u32,
    device_pixel_ratio: f64,
}

const TOOLBAR: Rgba<u8> = Rgba([60, 60, 60, 255]);

impl ImageProvider for DeviceCamera {
    fn get_image(&self) -> StitchResult<ImageBuffer> {
        let visible = self.viewport.get_image()?;
        let framed_height = visible.height() + self.header + self.footer;
        let mut framed = ImageBuffer::solid(visible.width(), framed_height, TOOLBAR);
        framed.composite(&visible, Location::new(0, self.header as i32));

        if self.device_pixel_ratio == 1.0 {
            Ok(framed)
        } else {
            framed.scale(self.device_pixel_ratio)
        }
    }
}

fn stitch_demo(
    options: DemoOptions,
    out: PathBuf,
    format: ImageFormat,
    quality: u8,
) -> Result<()> {
    if options.content.is_empty() || options.viewport.is_empty() {
        bail!("Content and viewport sizes must be non-zero");
    }

    let page = ImageBuffer::from_test_pattern(options.content.width, options.content.height);
    let viewport = Arc::new(MockViewport::new(page.clone(), options.viewport));

    let camera = DeviceCamera {
        viewport: viewport.clone(),
        header: options.header,
        footer: options.footer,
        device_pixel_ratio: options.device_pixel_ratio,
    };
    let scale: Box<dyn ScaleProvider> = if options.device_pixel_ratio == 1.0 {
        Box::new(NullScaleProvider)
    } else {
        Box::new(FixedScaleProvider::from_device_pixel_ratio(options.device_pixel_ratio)?)
    };
    let cut: Box<dyn CutProvider> = if options.header == 0 && options.footer == 0 {
        Box::new(NullCutProvider)
    } else {
        Box::new(FixedCutProvider::new(options.header, options.footer, 0, 0))
    };
    let region = match options.region {
        Some(region) => FixedRegionProvider::new(region, CoordinatesType::ContextRelative),
        None => FixedRegionProvider::entire(),
    };
    let factory = ViewportScreenshotFactory::new(viewport.clone());

    let providers = StitchProviders {
        image_provider: &camera,
        region_provider: &region,
        origin_provider: viewport.as_ref(),
        position_provider: viewport.as_ref(),
        scale_provider: scale.as_ref(),
        cut_provider: cut.as_ref(),
        screenshot_factory: &factory,
    };

    let mut config = StitchConfig::from_env();
    if let Some(wait) = options.wait {
        config.wait_before_screenshots = wait;
    }

    info!(
        "Stitching {} page through {} viewport ({} scroll bar margin)",
        options.content, options.viewport, config.max_scroll_bar_size
    );
    let stitched = FullPageCaptureAlgorithm::new(config)
        .get_stitched_region(&providers)
        .map_err(|e| {
            let hint = e.remediation_hint().to_string();
            anyhow::Error::new(e).context(hint)
        })?;

    // Only a whole, unscaled page can be compared pixel for pixel
    let matches_page = (options.device_pixel_ratio == 1.0 && options.region.is_none())
        .then(|| stitched.to_rgba8().as_raw() == page.to_rgba8().as_raw());

    let bytes = save_image(&stitched, &out, format, quality)
        .with_context(|| format!("Failed to write {}", out.display()))?;

    let summary = json!({
        "content": options.content,
        "viewport": options.viewport,
        "output": stitched.size(),
        "requested_positions": viewport.requested_positions().len(),
        "matches_page": matches_page,
        "format": format,
        "bytes": bytes,
        "out": out,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);

    if matches_page == Some(false) {
        bail!("Stitched image differs from the page");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_region_forms() {
        assert_eq!(parse_region("300x200").unwrap(), Region::new(0, 0, 300, 200));
        assert_eq!(parse_region("10,20,300x200").unwrap(), Region::new(10, 20, 300, 200));
        assert_eq!(parse_region("10, 20, 30, 40").unwrap(), Region::new(10, 20, 30, 40));
        assert_eq!(parse_region("-5,0,1x1").unwrap(), Region::new(-5, 0, 1, 1));
    }

    #[test]
    fn test_parse_region_rejects_garbage() {
        assert!(parse_region("").is_err());
        assert!(parse_region("1,2").is_err());
        assert!(parse_region("a,b,cxd").is_err());
    }

    #[test]
    fn test_device_camera_frames_and_scales() {
        let viewport = Arc::new(MockViewport::new(
            ImageBuffer::from_test_pattern(100, 300),
            RectangleSize::new(100, 100),
        ));
        let camera = DeviceCamera {
            viewport,
            header: 10,
            footer: 20,
            device_pixel_ratio: 2.0,
        };

        let image = camera.get_image().unwrap();
        assert_eq!(image.dimensions(), (200, 260));
    }

    #[test]
    fn test_stitch_demo_writes_matching_page() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("demo.png");
        let options = DemoOptions {
            content: RectangleSize::new(150, 400),
            viewport: RectangleSize::new(100, 120),
            region: None,
            wait: Some(Duration::ZERO),
            device_pixel_ratio: 1.0,
            header: 15,
            footer: 5,
        };

        stitch_demo(options, out.clone(), ImageFormat::Png, 50).unwrap();

        assert!(out.exists());
    }

    #[test]
    fn test_stitch_demo_rejects_empty_viewport() {
        let dir = tempfile::tempdir().unwrap();
        let options = DemoOptions {
            content: RectangleSize::new(150, 400),
            viewport: RectangleSize::new(0, 120),
            region: None,
            wait: Some(Duration::ZERO),
            device_pixel_ratio: 1.0,
            header: 0,
            footer: 0,
        };

        let result = stitch_demo(options, dir.path().join("x.png"), ImageFormat::Png, 50);
        assert!(result.is_err());
    }
}
