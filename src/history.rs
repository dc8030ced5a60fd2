//! The append-only record of what zeye waited for and clicked, with the frames as evidence.

use std::{
    fmt,
    fs,
    path::{Path, PathBuf},
};

use image::{DynamicImage, ImageError, RgbImage};
use log::{info, warn};
use zeye_cv::{draw_box, BoundingBox};

use crate::{
    config::HistoryFormat,
    error::{Result, ZeyeError},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Wait,
    Click,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Wait => "wait",
            ActionKind::Click => "click",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded action. Immutable once appended.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    index: usize,
    action: ActionKind,
    frame: RgbImage,
}

impl HistoryEntry {
    /// 1-based position in the history
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn action(&self) -> ActionKind {
        self.action
    }

    /// The frame with the target box drawn on it
    pub fn frame(&self) -> &RgbImage {
        &self.frame
    }

    /// `<action>_<index>.<ext>`
    pub fn file_name(&self, ext: &str) -> String {
        format!("{}_{}.{}", self.action, self.index, ext)
    }
}

/// What [`ActionHistory::dump`] managed to write.
#[derive(Debug, Default)]
pub struct DumpReport {
    pub written: Vec<PathBuf>,
    /// One [`ZeyeError::DumpIo`] per file that could not be written
    pub failures: Vec<ZeyeError>,
}

impl DumpReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct ActionHistory {
    entries: Vec<HistoryEntry>,
    annotation_color: [u8; 3],
    annotation_thickness: u32,
}

impl Default for ActionHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionHistory {
    pub fn new() -> Self {
        Self::with_annotation([0, 255, 0], 2)
    }

    pub fn with_annotation(color: [u8; 3], thickness: u32) -> Self {
        Self {
            entries: Vec::new(),
            annotation_color: color,
            annotation_thickness: thickness,
        }
    }

    /// Color and line width of the boxes drawn from now on.
    pub fn set_annotation(&mut self, color: [u8; 3], thickness: u32) {
        self.annotation_color = color;
        self.annotation_thickness = thickness;
    }

    /// Records `action`, keeping a copy of `frame` with `bbox` drawn on it.
    pub fn append(
        &mut self,
        action: ActionKind,
        frame: &DynamicImage,
        bbox: BoundingBox,
    ) -> &HistoryEntry {
        let mut annotated = frame.to_rgb8();
        draw_box(
            &mut annotated,
            bbox,
            self.annotation_color,
            self.annotation_thickness,
        );

        let index = self.entries.len() + 1;
        self.entries.push(HistoryEntry {
            index,
            action,
            frame: annotated,
        });
        info!("[ActionHistory]: recorded {action}_{index} at {bbox:?}");
        &self.entries[index - 1]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Drops every entry, the next one appended is numbered 1 again.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Writes every entry to `dir/<action>_<index>.<ext>`, in insertion order.
    ///
    /// `dir` is created if needed. The history itself is left untouched. A file
    /// that fails to write is reported in [`DumpReport::failures`] and the
    /// remaining entries are still written; nothing already written is removed.
    pub fn dump(&self, dir: impl AsRef<Path>, format: HistoryFormat) -> Result<DumpReport> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|err| ZeyeError::DumpIo {
            path: dir.to_path_buf(),
            source: ImageError::IoError(err),
        })?;

        let mut report = DumpReport::default();
        for entry in &self.entries {
            let path = dir.join(entry.file_name(format.extension()));
            match entry.frame.save_with_format(&path, format.image_format()) {
                Ok(()) => report.written.push(path),
                Err(source) => {
                    warn!("[ActionHistory::dump]: failed to write {path:?}: {source}");
                    report.failures.push(ZeyeError::DumpIo { path, source });
                }
            }
        }
        info!(
            "[ActionHistory::dump]: {} written, {} failed, to {:?}",
            report.written.len(),
            report.failures.len(),
            dir
        );
        Ok(report)
    }
}

#[cfg(test)]
mod test {
    use std::fs;

    use image::{DynamicImage, Rgb, RgbImage};

    use super::*;

    fn frame(shade: u8) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(32, 24, Rgb([shade, shade, shade])))
    }

    fn bbox() -> BoundingBox {
        BoundingBox::from_xywh(4, 4, 10, 8)
    }

    #[test]
    fn test_append_indices_and_annotation() {
        let mut history = ActionHistory::new();
        let source = frame(10);
        let entry = history.append(ActionKind::Click, &source, bbox());
        assert_eq!(entry.index(), 1);
        assert_eq!(entry.action(), ActionKind::Click);
        assert_eq!(entry.frame().get_pixel(4, 4), &Rgb([0, 255, 0]));
        assert_eq!(entry.frame().get_pixel(8, 8), &Rgb([10, 10, 10]));
        // the source frame is never drawn on
        assert_eq!(source.to_rgb8().get_pixel(4, 4), &Rgb([10, 10, 10]));

        history.append(ActionKind::Wait, &frame(20), bbox());
        let indices: Vec<_> = history.iter().map(|e| e.file_name("jpg")).collect();
        assert_eq!(indices, vec!["click_1.jpg", "wait_2.jpg"]);
    }

    #[test]
    fn test_dump_writes_every_entry() {
        let dir = tempfile::tempdir().unwrap();
        let mut history = ActionHistory::new();
        for shade in [10, 60, 110] {
            history.append(ActionKind::Click, &frame(shade), bbox());
        }

        let report = history.dump(dir.path(), HistoryFormat::Jpg).unwrap();
        assert!(report.is_complete());
        assert_eq!(
            report.written,
            vec![
                dir.path().join("click_1.jpg"),
                dir.path().join("click_2.jpg"),
                dir.path().join("click_3.jpg"),
            ]
        );
        assert_eq!(history.len(), 3);

        let first: Vec<Vec<u8>> = report.written.iter().map(|p| fs::read(p).unwrap()).collect();
        let again = history.dump(dir.path(), HistoryFormat::Jpg).unwrap();
        let second: Vec<Vec<u8>> = again.written.iter().map(|p| fs::read(p).unwrap()).collect();
        assert_eq!(first, second);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 3);
    }

    #[test]
    fn test_dump_png_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut history = ActionHistory::new();
        history.append(ActionKind::Wait, &frame(42), bbox());

        let report = history.dump(dir.path().join("nested"), HistoryFormat::Png).unwrap();
        let saved = image::open(&report.written[0]).unwrap().to_rgb8();
        assert_eq!(&saved, history.entries()[0].frame());
    }

    #[test]
    fn test_dump_failure_does_not_abort() {
        let dir = tempfile::tempdir().unwrap();
        let mut history = ActionHistory::new();
        for _ in 0..3 {
            history.append(ActionKind::Click, &frame(0), bbox());
        }
        // a directory where the second file should go
        fs::create_dir(dir.path().join("click_2.png")).unwrap();

        let report = history.dump(dir.path(), HistoryFormat::Png).unwrap();
        assert!(!report.is_complete());
        assert_eq!(report.written.len(), 2);
        assert!(dir.path().join("click_3.png").is_file());
        assert!(matches!(
            &report.failures[..],
            [ZeyeError::DumpIo { path, .. }] if path.ends_with("click_2.png")
        ));
    }

    #[test]
    fn test_dump_into_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("not-a-dir");
        fs::write(&file, b"x").unwrap();

        let mut history = ActionHistory::new();
        history.append(ActionKind::Click, &frame(0), bbox());
        assert!(matches!(
            history.dump(&file, HistoryFormat::Png),
            Err(ZeyeError::DumpIo { .. })
        ));
    }

    #[test]
    fn test_clear_restarts_numbering() {
        let mut history = ActionHistory::new();
        history.append(ActionKind::Click, &frame(0), bbox());
        history.append(ActionKind::Click, &frame(0), bbox());
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.append(ActionKind::Wait, &frame(0), bbox()).index(), 1);
    }
}
