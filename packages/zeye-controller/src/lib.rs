//! zeye-controller contains the device side of zeye: grabbing a frame of the
//! desktop and moving/clicking the pointer.

use image::DynamicImage;

#[cfg(feature = "desktop")]
pub mod desktop;
#[cfg(feature = "desktop")]
pub use desktop::DesktopController;

/// [`Controller`] 承担着设备操作相关的事情，如截图、移动指针与点击
///
/// All coordinates are in the pixel space of the frames returned by [`Controller::screencap`].
pub trait Controller {
    /// Capture the whole desktop as it is now.
    fn screencap(&self) -> anyhow::Result<DynamicImage>;

    /// Move the pointer to `(x, y)`.
    fn move_to(&self, x: i32, y: i32) -> anyhow::Result<()>;

    /// Click the primary button where the pointer currently is.
    fn click(&self) -> anyhow::Result<()>;

    /// [`Controller::move_to`] followed by [`Controller::click`].
    fn click_at(&self, x: i32, y: i32) -> anyhow::Result<()> {
        self.move_to(x, y)?;
        self.click()
    }
}

impl<C: Controller + ?Sized> Controller for Box<C> {
    fn screencap(&self) -> anyhow::Result<DynamicImage> {
        (**self).screencap()
    }

    fn move_to(&self, x: i32, y: i32) -> anyhow::Result<()> {
        (**self).move_to(x, y)
    }

    fn click(&self) -> anyhow::Result<()> {
        (**self).click()
    }
}

#[cfg(test)]
mod test {
    use std::sync::Mutex;

    use image::DynamicImage;

    use super::Controller;

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<String>>,
    }

    impl Controller for Recorder {
        fn screencap(&self) -> anyhow::Result<DynamicImage> {
            Ok(DynamicImage::new_rgb8(4, 4))
        }

        fn move_to(&self, x: i32, y: i32) -> anyhow::Result<()> {
            self.calls.lock().unwrap().push(format!("move {x},{y}"));
            Ok(())
        }

        fn click(&self) -> anyhow::Result<()> {
            self.calls.lock().unwrap().push("click".to_string());
            Ok(())
        }
    }

    #[test]
    fn test_click_at_moves_then_clicks() {
        let controller: Box<dyn Controller> = Box::new(Recorder::default());
        controller.click_at(120, 60).unwrap();
        assert_eq!(controller.screencap().unwrap().width(), 4);

        let recorder = Recorder::default();
        recorder.click_at(3, 4).unwrap();
        assert_eq!(*recorder.calls.lock().unwrap(), vec!["move 3,4", "click"]);
    }
}
