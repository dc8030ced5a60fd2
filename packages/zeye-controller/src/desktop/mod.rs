//! The real desktop: primary monitor capture with `xcap`, pointer input with `enigo`.

use anyhow::{anyhow, Context};
use enigo::{Button, Coordinate::Abs, Direction::Click, Enigo, Mouse, Settings};
use image::{DynamicImage, RgbaImage};
use log::{debug, info};

use crate::Controller;

/// Opens a fresh input connection for every action.
pub struct DesktopController {
    settings: Settings,
}

impl DesktopController {
    pub fn new() -> anyhow::Result<Self> {
        let settings = Settings::default();
        // fail early if there is no input backend at all
        Enigo::new(&settings).map_err(|err| anyhow!("failed to create enigo: {err}"))?;
        info!("[DesktopController]: created");
        Ok(Self { settings })
    }

    fn enigo(&self) -> anyhow::Result<Enigo> {
        Enigo::new(&self.settings).map_err(|err| anyhow!("failed to create enigo: {err}"))
    }
}

impl Controller for DesktopController {
    fn screencap(&self) -> anyhow::Result<DynamicImage> {
        let monitor = xcap::Monitor::all()
            .context("failed to list monitors")?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("no monitor found"))?;
        let capture = monitor
            .capture_image()
            .context("failed to capture monitor")?;

        let (width, height) = (capture.width(), capture.height());
        let image = RgbaImage::from_raw(width, height, capture.into_raw())
            .ok_or_else(|| anyhow!("capture buffer does not match {width}x{height}"))?;
        debug!("[DesktopController]: captured {width}x{height}");
        Ok(DynamicImage::ImageRgba8(image).into_rgb8().into())
    }

    fn move_to(&self, x: i32, y: i32) -> anyhow::Result<()> {
        self.enigo()?
            .move_mouse(x, y, Abs)
            .map_err(|err| anyhow!("failed to move pointer to ({x}, {y}): {err}"))
    }

    fn click(&self) -> anyhow::Result<()> {
        self.enigo()?
            .button(Button::Left, Click)
            .map_err(|err| anyhow!("failed to click: {err}"))
    }
}
