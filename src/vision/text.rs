use image::DynamicImage;
use log::debug;
use zeye_cv::BoundingBox;

use crate::{
    error::Result,
    vision::{
        ocr::{Word, WordRecognizer},
        MatchResult,
    },
};

/// Finds the first run of consecutive `words` that, joined by single spaces, equals `phrase`.
///
/// The phrase is split on whitespace into `n` tokens and a window of `n` words slides
/// over `words` from the start; near the end the window is shorter and simply never
/// matches. The first exact hit wins.
///
/// The box goes from the top-left of the first word to the bottom-right of the last
/// one. Words in between are not taken into account, so a middle word sticking out
/// above or below is not enclosed.
pub fn match_words(words: &[Word], phrase: &str) -> MatchResult {
    let n = phrase.split_whitespace().count();
    if n == 0 {
        return MatchResult::not_found();
    }

    for i in 0..words.len() {
        let candidate = &words[i..(i + n).min(words.len())];
        let joined = candidate
            .iter()
            .map(|word| word.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        if joined == phrase {
            let (first, last) = (&candidate[0], &candidate[candidate.len() - 1]);
            return MatchResult::at(BoundingBox::from_corners(
                first.top_left(),
                last.bottom_right(),
            ));
        }
    }
    MatchResult::not_found()
}

/// Recognizes the words in `frame` and looks for `phrase` among them.
pub fn match_text<R>(frame: &DynamicImage, phrase: &str, recognizer: &R) -> Result<MatchResult>
where
    R: WordRecognizer + ?Sized,
{
    let words = recognizer.recognize_words(frame)?;
    let res = match_words(&words, phrase);
    debug!(
        "[match_text]: {:?} among {} words: {:?}",
        phrase,
        words.len(),
        res.bbox()
    );
    Ok(res)
}
