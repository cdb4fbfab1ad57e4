use crate::consts;
use ratatui::layout::{Flex, Layout, Rect, Size};
use std::path::PathBuf;

pub(crate) fn get_display_area(buffer_area: Rect) -> Rect {
    center_rect(buffer_area, consts::DISPLAY_SIZE)
}

/// Return a `Rect` of the given size centered within `area`, shrunk to fit if
/// necessary
pub(crate) fn center_rect(area: Rect, size: Size) -> Rect {
    let [rect] = Layout::horizontal([size.width])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::vertical([size.height])
        .flex(Flex::Center)
        .areas(rect);
    rect
}

/// Return the directory in which the high score & log files are stored by
/// default
pub(crate) fn data_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|p| p.join("gridsnake"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Rect::new(0, 0, 80, 24), Size::new(22, 8), Rect::new(29, 8, 22, 8))]
    #[case(Rect::new(0, 1, 80, 21), Size::new(22, 7), Rect::new(29, 8, 22, 7))]
    #[case(Rect::new(10, 5, 80, 24), Size::new(80, 24), Rect::new(10, 5, 80, 24))]
    #[case(Rect::new(0, 0, 100, 30), consts::DISPLAY_SIZE, Rect::new(10, 3, 80, 24))]
    fn test_center_rect(#[case] area: Rect, #[case] size: Size, #[case] expected: Rect) {
        assert_eq!(center_rect(area, size), expected);
    }
}
